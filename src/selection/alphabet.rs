//! Regional-indicator labels used as reaction choices.

/// The 26 regional indicator symbols, 🇦 through 🇿.
///
/// Label `i` marks item `i`; items past the end of the alphabet cannot be
/// labelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelAlphabet;

const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

impl LabelAlphabet {
    pub const LEN: usize = 26;

    /// Reaction symbol for item `index`.
    pub fn symbol(index: usize) -> Option<String> {
        if index >= Self::LEN {
            return None;
        }
        char::from_u32(REGIONAL_INDICATOR_A + index as u32).map(String::from)
    }

    /// Item index for a reaction symbol, if it is one of the labels.
    pub fn index_of(symbol: &str) -> Option<usize> {
        let mut chars = symbol.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let offset = u32::from(c).checked_sub(REGIONAL_INDICATOR_A)? as usize;
        (offset < Self::LEN).then_some(offset)
    }

    /// Plain letter shown next to item `index` in result lists.
    pub fn letter(index: usize) -> Option<char> {
        (index < Self::LEN).then(|| char::from(b'A' + index as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_and_indices_agree() {
        assert_eq!(LabelAlphabet::symbol(0).as_deref(), Some("🇦"));
        assert_eq!(LabelAlphabet::symbol(25).as_deref(), Some("🇿"));
        assert_eq!(LabelAlphabet::symbol(26), None);

        assert_eq!(LabelAlphabet::index_of("🇧"), Some(1));
        assert_eq!(LabelAlphabet::index_of("👍"), None);
        assert_eq!(LabelAlphabet::index_of("🇦🇧"), None);
        assert_eq!(LabelAlphabet::index_of(""), None);
    }

    #[test]
    fn letters() {
        assert_eq!(LabelAlphabet::letter(0), Some('A'));
        assert_eq!(LabelAlphabet::letter(2), Some('C'));
        assert_eq!(LabelAlphabet::letter(26), None);
    }
}
