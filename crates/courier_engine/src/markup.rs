//! Inline-keyboard parsing from the rules' button string.
//!
//! One `[Text](url)` per button; `|` separates buttons on a row, newlines
//! separate rows. Cells that do not parse are dropped rather than failing
//! the whole keyboard.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

/// Serialized as the platform's `reply_markup` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Parses the button spec; `None` when no valid button remains.
pub fn parse_buttons(spec: &str) -> Option<InlineKeyboard> {
    let rows: Vec<Vec<InlineKeyboardButton>> = spec
        .lines()
        .map(|line| line.split('|').filter_map(parse_button).collect::<Vec<_>>())
        .filter(|row: &Vec<InlineKeyboardButton>| !row.is_empty())
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboard {
            inline_keyboard: rows,
        })
    }
}

fn parse_button(cell: &str) -> Option<InlineKeyboardButton> {
    let cell = cell.trim();
    let rest = cell.strip_prefix('[')?;
    let (text, rest) = rest.split_once("](")?;
    let url = rest.strip_suffix(')')?;
    if text.is_empty() || url.is_empty() {
        return None;
    }
    Some(InlineKeyboardButton {
        text: text.to_string(),
        url: url.to_string(),
    })
}
