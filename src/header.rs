use regex::Regex;

use crate::domain::Accession;

/// Header-cleaning knobs, passed explicitly so cleaning stays a pure function.
#[derive(Debug, Clone, Copy)]
pub struct HeaderOptions {
    /// Maximum description length after cleaning.
    pub desc_len: usize,
    /// Keep the whole description regardless of `desc_len`.
    pub full_desc: bool,
    /// Preserve whitespace instead of squashing runs into `_`.
    pub keep_whitespace: bool,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            desc_len: 50,
            full_desc: false,
            keep_whitespace: false,
        }
    }
}

impl HeaderOptions {
    pub fn separator(&self) -> char {
        if self.keep_whitespace { ' ' } else { '_' }
    }
}

/// Clean one raw header line (without the leading `>`).
///
/// Drops the `gi|<num>|<db>|<acc>|` prefix, strips leading whitespace, deletes
/// `, . ; : = ( )`, squashes whitespace runs to `_` (unless preserved), and
/// prefix-truncates to `desc_len` (unless the full description is kept).
pub fn clean_description(header: &str, options: &HeaderOptions) -> String {
    let fields: Vec<&str> = header.split('|').collect();
    let remainder = if fields.len() > 4 {
        fields[4..].join("|")
    } else {
        String::new()
    };

    let mut text: String = remainder
        .trim_start()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '.' | ';' | ':' | '=' | '(' | ')'))
        .collect();

    if !options.keep_whitespace {
        let runs = Regex::new(r"\s+").unwrap();
        text = runs.replace_all(&text, "_").into_owned();
    }
    if !options.full_desc {
        text = text.chars().take(options.desc_len).collect();
    }
    text
}

/// Rebuild one fetched record: cleaned header first, sequence lines untouched.
pub fn sanitize_record(raw: &str, accession: &Accession, options: &HeaderOptions) -> String {
    let mut lines = raw.lines();
    let header = lines.next().unwrap_or("").trim_start_matches('>');

    let mut record = format!(
        ">{}{}{}",
        accession,
        options.separator(),
        clean_description(header, options)
    );
    for line in lines {
        record.push('\n');
        record.push_str(line);
    }
    record
}
