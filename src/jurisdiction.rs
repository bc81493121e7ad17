//! Jurisdiction (city/county) codes.
//!
//! The first character of an extract filename is a single-letter
//! jurisdiction code (`a` = 臺北市, `f` = 新北市, ...). The table is
//! fixed for the process lifetime and lookups are case-insensitive.
//! Note the gaps: `l`, `r`, `s`, and `y` are unassigned.

/// Code → name table, in code order.
const CODES: [(char, &str); 22] = [
    ('a', "臺北市"),
    ('b', "臺中市"),
    ('c', "基隆市"),
    ('d', "臺南市"),
    ('e', "高雄市"),
    ('f', "新北市"),
    ('g', "宜蘭縣"),
    ('h', "桃園市"),
    ('i', "嘉義市"),
    ('j', "新竹縣"),
    ('k', "苗栗縣"),
    ('m', "南投縣"),
    ('n', "彰化縣"),
    ('o', "新竹市"),
    ('p', "雲林縣"),
    ('q', "嘉義縣"),
    ('t', "屏東縣"),
    ('u', "花蓮縣"),
    ('v', "臺東縣"),
    ('w', "金門縣"),
    ('x', "澎湖縣"),
    ('z', "連江縣"),
];

/// A resolved jurisdiction: single-letter code plus display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jurisdiction {
    /// Lower-cased single-letter code.
    pub code: char,
    /// City/county name.
    pub name: &'static str,
}

/// Look up a jurisdiction by code (case-insensitive).
pub fn by_code(code: char) -> Option<Jurisdiction> {
    let code = code.to_ascii_lowercase();
    CODES
        .iter()
        .find(|&&(c, _)| c == code)
        .map(|&(code, name)| Jurisdiction { code, name })
}

/// Reverse lookup: jurisdiction by exact name.
pub fn by_name(name: &str) -> Option<Jurisdiction> {
    CODES
        .iter()
        .find(|&&(_, n)| n == name)
        .map(|&(code, name)| Jurisdiction { code, name })
}

/// Extract the jurisdiction from a filename (no path).
///
/// The first character is taken as the code only when the second
/// character is an underscore; this guards against filenames that do not
/// follow the `{code}_...` convention. Returns `None` on either a
/// malformed name or an unassigned code; the caller reports this
/// distinctly from classification failure.
pub fn from_filename(filename: &str) -> Option<Jurisdiction> {
    let mut chars = filename.chars();
    let first = chars.next()?;
    if chars.next() != Some('_') {
        return None;
    }
    by_code(first)
}

/// All assigned jurisdictions, in code order.
pub fn all() -> impl Iterator<Item = Jurisdiction> {
    CODES.iter().map(|&(code, name)| Jurisdiction { code, name })
}
