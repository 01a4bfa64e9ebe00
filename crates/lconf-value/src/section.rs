use indexmap::IndexMap;

use crate::error::AccessError;
use crate::value::{FromScalar, Kind, Scalar};

/// One named entry of a [`Section`]: either a scalar leaf, an ordered
/// vector of scalars, or a nested section.
#[derive(Debug, Clone, PartialEq)]
pub enum Kwarg {
    Scalar(Scalar),
    Vector(Vec<Scalar>),
    Section(Section),
}

impl Kwarg {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Scalar(scalar) => scalar.kind(),
            Self::Vector(_) => Kind::Vector,
            Self::Section(_) => Kind::Section,
        }
    }
}

/// A tree node mapping names to child values.
///
/// Children are exclusively owned by their parent and dropped with it.
/// Keys are unique; insertion order is preserved so that dump output is
/// deterministic and matches declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    entries: IndexMap<String, Kwarg>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over direct children in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Kwarg)> {
        self.entries.iter().map(|(name, kwarg)| (name.as_str(), kwarg))
    }

    /// Insert a child. The last assignment for a given name wins; the
    /// entry keeps its original position in declaration order.
    pub fn insert(&mut self, name: impl Into<String>, kwarg: Kwarg) {
        self.entries.insert(name.into(), kwarg);
    }

    /// Mutable handle on the named child section, creating an empty one
    /// (and replacing any non-section entry of the same name) if needed.
    ///
    /// This is how a section split across several `name = { ... }` blocks
    /// merges into one node.
    pub fn section_entry(&mut self, name: impl Into<String>) -> &mut Section {
        let name = name.into();
        if !matches!(self.entries.get(&name), Some(Kwarg::Section(_))) {
            self.entries
                .insert(name.clone(), Kwarg::Section(Section::new(name.clone())));
        }
        match self.entries.get_mut(&name) {
            Some(Kwarg::Section(section)) => section,
            _ => unreachable!("section_entry inserted a section above"),
        }
    }

    pub fn get_kwarg(&self, key: &str) -> Result<&Kwarg, AccessError> {
        self.entries
            .get(key)
            .ok_or_else(|| AccessError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn has_kwarg(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// True only if the key exists *and* holds a section.
    pub fn has_section(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Kwarg::Section(_)))
    }

    /// True only if the key exists *and* holds a vector.
    pub fn has_vector(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(Kwarg::Vector(_)))
    }

    pub fn section(&self, key: &str) -> Result<&Section, AccessError> {
        match self.get_kwarg(key)? {
            Kwarg::Section(section) => Ok(section),
            other => Err(AccessError::mismatch(key, Kind::Section, other.kind())),
        }
    }

    pub fn vector(&self, key: &str) -> Result<&[Scalar], AccessError> {
        match self.get_kwarg(key)? {
            Kwarg::Vector(items) => Ok(items),
            other => Err(AccessError::mismatch(key, Kind::Vector, other.kind())),
        }
    }

    /// Typed scalar access.
    pub fn get<T: FromScalar>(&self, key: &str) -> Result<T, AccessError> {
        match self.get_kwarg(key)? {
            Kwarg::Scalar(scalar) => T::from_scalar(key, scalar),
            other => Err(AccessError::mismatch(key, T::expected(), other.kind())),
        }
    }

    /// Like [`Section::get`], but an absent key yields `default` instead
    /// of an error. A present key of the wrong kind still fails.
    pub fn get_or<T: FromScalar>(&self, key: &str, default: T) -> Result<T, AccessError> {
        if self.has_kwarg(key) {
            self.get(key)
        } else {
            Ok(default)
        }
    }

    /// Walk dotted path segments through nested sections and test the
    /// leaf entry's kind.
    pub fn assert_type(&self, path: &str, kind: Kind) -> bool {
        match path.split_once('.') {
            None => self
                .entries
                .get(path)
                .is_some_and(|kwarg| kwarg.kind() == kind),
            Some((head, rest)) => match self.entries.get(head) {
                Some(Kwarg::Section(section)) => section.assert_type(rest, kind),
                _ => false,
            },
        }
    }

    fn fmt_indented(&self, f: &mut core::fmt::Formatter<'_>, depth: usize) -> core::fmt::Result {
        let pad = "    ".repeat(depth);
        writeln!(f, "{pad}{} {{", self.name)?;
        for (name, kwarg) in self.iter() {
            match kwarg {
                Kwarg::Scalar(scalar) => writeln!(f, "{pad}    {name} = {scalar}")?,
                Kwarg::Vector(items) => {
                    write!(f, "{pad}    {name} = [")?;
                    for (i, item) in items.iter().enumerate() {
                        if i != 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    writeln!(f, "]")?;
                }
                Kwarg::Section(child) => child.fmt_indented(f, depth + 1)?,
            }
        }
        writeln!(f, "{pad}}}")
    }
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Section {
        let mut root = Section::new("ROOT");
        root.insert("flag", Kwarg::Scalar(Scalar::Bool(true)));
        root.insert("count", Kwarg::Scalar(Scalar::Integer(-300)));
        root.insert("ratio", Kwarg::Scalar(Scalar::Float(3.5)));
        root.insert("label", Kwarg::Scalar(Scalar::from("words")));
        root.insert(
            "data",
            Kwarg::Vector(vec![Scalar::Integer(0), Scalar::Integer(1)]),
        );
        let sub = root.section_entry("sub");
        sub.insert("inner", Kwarg::Scalar(Scalar::Integer(7)));
        root
    }

    #[test]
    fn test_typed_access() {
        let root = sample();
        assert_eq!(root.get::<bool>("flag"), Ok(true));
        assert_eq!(root.get::<i64>("count"), Ok(-300));
        assert_eq!(root.get::<f64>("ratio"), Ok(3.5));
        assert_eq!(root.get::<String>("label"), Ok("words".to_string()));
    }

    #[test]
    fn test_key_not_found() {
        let root = sample();
        assert_eq!(
            root.get::<i64>("absent"),
            Err(AccessError::KeyNotFound {
                key: "absent".into()
            })
        );
        // A failed access leaves the tree usable.
        assert_eq!(root.get::<bool>("flag"), Ok(true));
    }

    #[test]
    fn test_get_or_default() {
        let root = sample();
        assert_eq!(root.get_or::<i64>("absent", 42), Ok(42));
        assert_eq!(root.get_or::<i64>("count", 42), Ok(-300));
        // Present but mistyped is still an error, not the default.
        assert!(root.get_or::<bool>("count", false).is_err());
    }

    #[test]
    fn test_has_checks_are_typed() {
        let root = sample();
        assert!(root.has_kwarg("flag"));
        assert!(root.has_section("sub"));
        assert!(!root.has_section("flag"));
        assert!(root.has_vector("data"));
        assert!(!root.has_vector("sub"));
    }

    #[test]
    fn test_last_assignment_wins_keeps_position() {
        let mut root = sample();
        root.insert("flag", Kwarg::Scalar(Scalar::Bool(false)));
        assert_eq!(root.get::<bool>("flag"), Ok(false));
        let first = root.iter().next().map(|(name, _)| name);
        assert_eq!(first, Some("flag"));
    }

    #[test]
    fn test_section_entry_merges() {
        let mut root = sample();
        root.section_entry("sub")
            .insert("extra", Kwarg::Scalar(Scalar::Bool(false)));
        let sub = root.section("sub").unwrap();
        assert_eq!(sub.get::<i64>("inner"), Ok(7));
        assert_eq!(sub.get::<bool>("extra"), Ok(false));
    }

    #[test]
    fn test_assert_type_walks_dotted_path() {
        let root = sample();
        assert!(root.assert_type("sub.inner", Kind::Integral));
        assert!(!root.assert_type("sub.inner", Kind::Floating));
        assert!(!root.assert_type("sub.missing", Kind::Integral));
        assert!(!root.assert_type("label.inner", Kind::Integral));
        assert!(root.assert_type("ratio", Kind::Floating));
    }

    #[test]
    fn test_display_order_is_declaration_order() {
        let root = sample();
        let dump = root.to_string();
        let flag = dump.find("flag").unwrap();
        let count = dump.find("count").unwrap();
        let sub = dump.find("sub {").unwrap();
        assert!(flag < count && count < sub);
        assert!(dump.contains("label = \"words\""));
        assert!(dump.contains("data = [0, 1]"));
    }
}
