//! Caption rewrite pipeline.
//!
//! A fixed stage order, each stage operating on the output of the previous
//! one; a stage whose rule field is empty or disabled is a no-op. The
//! pipeline is compiled once per rule set and the transform itself never
//! fails: a user pattern that does not compile degrades to plain substring
//! replacement.

use courier_core::CaptionRules;
use regex::{Regex, RegexBuilder};

const URL_PATTERN: &str = r"(?:https?|ftp)://[\S\n]+";
const TME_PATTERN: &str = r"t\.me/[\S\n]+";
const USERNAME_PATTERN: &str = r"@\w+";
const NEWLINE_RUNS_PATTERN: &str = r"\n{3,}";

/// Decided once at build time, keeping the invalid-pattern fallback
/// explicit and testable.
#[derive(Debug, Clone)]
enum CompiledReplacement {
    Pattern { regex: Regex, to: String },
    /// The rule's `from` failed to compile as a pattern.
    Literal { from: String, to: String },
}

/// A rule set compiled for repeated application over one run.
#[derive(Debug, Clone)]
pub struct CaptionPipeline {
    strip_url: Option<Regex>,
    strip_tme: Option<Regex>,
    strip_usernames: Option<Regex>,
    strip_emojis: bool,
    remove_words: Option<Regex>,
    replacements: Vec<CompiledReplacement>,
    symbols_to_remove: String,
    symbols_to_replace: String,
    template: Option<String>,
    custom_languages: Vec<String>,
    custom_qualities: Vec<String>,
    prefix: String,
    suffix: String,
    newline_runs: Option<Regex>,
}

impl CaptionPipeline {
    pub fn new(rules: &CaptionRules) -> Self {
        let remove_words = if rules.remove_words.is_empty() {
            None
        } else {
            let alternation = rules
                .remove_words
                .iter()
                .map(|word| regex::escape(word))
                .collect::<Vec<_>>()
                .join("|");
            // Escaped literals always compile.
            RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .ok()
        };

        let replacements = rules
            .replacements
            .iter()
            .filter(|rule| !rule.from.is_empty())
            .map(|rule| {
                match RegexBuilder::new(&rule.from).case_insensitive(true).build() {
                    Ok(regex) => CompiledReplacement::Pattern {
                        regex,
                        to: rule.to.clone(),
                    },
                    Err(_) => CompiledReplacement::Literal {
                        from: rule.from.clone(),
                        to: rule.to.clone(),
                    },
                }
            })
            .collect();

        let template = if rules.template.trim().is_empty() {
            None
        } else {
            Some(rules.template.clone())
        };

        Self {
            strip_url: rules.remove_links.then(|| fixed(URL_PATTERN)),
            strip_tme: rules.remove_links.then(|| fixed(TME_PATTERN)),
            strip_usernames: rules.remove_usernames.then(|| fixed(USERNAME_PATTERN)),
            strip_emojis: rules.remove_emojis,
            remove_words,
            replacements,
            symbols_to_remove: rules.symbols_to_remove.clone(),
            symbols_to_replace: rules.symbols_to_replace.clone(),
            template,
            custom_languages: rules.custom_languages.clone(),
            custom_qualities: rules.custom_qualities.clone(),
            prefix: rules.prefix.clone(),
            suffix: rules.suffix.clone(),
            newline_runs: rules.single_line_space.then(|| fixed(NEWLINE_RUNS_PATTERN)),
        }
    }

    /// Rewrites one caption. Pure and total: identical inputs always yield
    /// identical output, and empty input is tolerated by every stage.
    pub fn transform(&self, raw_text: &str, file_name: &str, file_size_bytes: u64) -> String {
        let mut caption = raw_text.to_string();

        if let Some(pattern) = &self.strip_url {
            caption = pattern.replace_all(&caption, "").into_owned();
        }
        if let Some(pattern) = &self.strip_tme {
            caption = pattern.replace_all(&caption, "").into_owned();
        }
        if let Some(pattern) = &self.strip_usernames {
            caption = pattern.replace_all(&caption, "").into_owned();
        }
        if self.strip_emojis {
            caption.retain(|c| !is_emoji_like(c));
        }
        if let Some(pattern) = &self.remove_words {
            caption = pattern.replace_all(&caption, "").into_owned();
        }
        for rule in &self.replacements {
            caption = match rule {
                CompiledReplacement::Pattern { regex, to } => {
                    regex.replace_all(&caption, to.as_str()).into_owned()
                }
                CompiledReplacement::Literal { from, to } => caption.replace(from.as_str(), to),
            };
        }
        if !self.symbols_to_remove.is_empty() {
            caption.retain(|c| !self.symbols_to_remove.contains(c));
        }
        if !self.symbols_to_replace.is_empty() {
            caption = caption
                .chars()
                .map(|c| {
                    if self.symbols_to_replace.contains(c) {
                        ' '
                    } else {
                        c
                    }
                })
                .collect();
        }
        if let Some(template) = &self.template {
            caption = self.apply_template(template, &caption, file_name, file_size_bytes);
        }
        if !self.prefix.is_empty() {
            caption = format!("{}\n{}", self.prefix, caption);
        }
        if !self.suffix.is_empty() {
            caption = format!("{}\n{}", caption, self.suffix);
        }
        if let Some(pattern) = &self.newline_runs {
            caption = pattern.replace_all(&caption, "\n\n").into_owned();
            caption = caption.trim().to_string();
        }

        caption
    }

    /// Placeholders are substituted at their first occurrence only; anything
    /// unrecognized stays verbatim. A template without `{default_caption}`
    /// drops the cleaned text entirely.
    fn apply_template(
        &self,
        template: &str,
        cleaned: &str,
        file_name: &str,
        file_size_bytes: u64,
    ) -> String {
        template
            .replacen("{default_caption}", cleaned, 1)
            .replacen("{file_name}", file_name, 1)
            .replacen("{file_size}", &format_file_size(file_size_bytes), 1)
            .replacen(
                "{language}",
                &detect_from_list(cleaned, &self.custom_languages),
                1,
            )
            .replacen(
                "{quality}",
                &detect_from_list(cleaned, &self.custom_qualities),
                1,
            )
    }
}

/// Characters treated as emoji/dingbat noise when emoji stripping is on.
fn is_emoji_like(c: char) -> bool {
    matches!(
        u32::from(c),
        0x2011..=0x26FF
            | 0x2700..=0x27BF
            | 0xE000..=0xF8FF
            | 0x1F000..=0x1F3FF
            | 0x1F400..=0x1F7FF
            | 0x1F910..=0x1F9FF
    )
}

fn fixed(pattern: &str) -> Regex {
    Regex::new(pattern).expect("fixed pattern compiles")
}

/// Human-readable size with a base-1024 unit ladder; trailing zeros are
/// trimmed, so 1.5 MB rather than 1.50 MB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exponent = ((bytes as f64).log2() / 10.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[exponent])
}

/// Entries whose literal text occurs in the caption, case-insensitively,
/// joined with ", "; `Unknown` when none match.
fn detect_from_list(text: &str, entries: &[String]) -> String {
    let haystack = text.to_lowercase();
    let found: Vec<&str> = entries
        .iter()
        .filter(|entry| !entry.is_empty() && haystack.contains(&entry.to_lowercase()))
        .map(|entry| entry.as_str())
        .collect();
    if found.is_empty() {
        "Unknown".to_string()
    } else {
        found.join(", ")
    }
}
