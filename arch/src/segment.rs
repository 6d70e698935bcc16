use strum::{Display, EnumIter, EnumString};

/// Storage segments addressed by `push`/`pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(seg) => Ok(seg),
            Err(_) => Err(format!("Unknown segment name: `{s}`")),
        }
    }

    /// `constant` only yields the pushed literal, it has no storage to pop into.
    pub fn is_writable(&self) -> bool {
        !matches!(self, Segment::Constant)
    }

    /// Number of slots of the segments mapped onto a fixed address range.
    pub fn capacity(&self) -> Option<u16> {
        match self {
            Segment::Pointer => Some(2),
            Segment::Temp => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_are_lowercase() {
        let names: Vec<String> = Segment::iter().map(|seg| seg.to_string()).collect();
        assert_eq!(
            names,
            ["constant", "argument", "local", "static", "this", "that", "pointer", "temp"]
        );
    }

    #[test]
    fn parse() {
        assert_eq!(Segment::parse("that"), Ok(Segment::That));
        assert!(Segment::parse("THAT").is_err());
        assert!(Segment::parse("heap").is_err());
    }

    #[test]
    fn fixed_ranges() {
        assert_eq!(Segment::Pointer.capacity(), Some(2));
        assert_eq!(Segment::Temp.capacity(), Some(8));
        assert_eq!(Segment::Local.capacity(), None);
        assert!(!Segment::Constant.is_writable());
        assert!(Segment::Static.is_writable());
    }
}
