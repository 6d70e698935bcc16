use crate::error::Error;
use arch::segment::Segment;
use indexmap::IndexMap;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    Static,
    Field,
    Argument,
    Local,
}

impl Kind {
    /// Static and field live in the class scope, the rest in the subroutine scope.
    pub fn is_class_level(&self) -> bool {
        matches!(self, Kind::Static | Kind::Field)
    }

    pub fn segment(&self) -> Segment {
        match self {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Argument => Segment::Argument,
            Kind::Local => Segment::Local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub ty: String,
    pub kind: Kind,
    pub index: u16,
}

/// How a call qualified by `name` binds its receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// `name` is a variable: push it as the implicit first argument and call
    /// into its declared type.
    Receiver {
        segment: Segment,
        index: u16,
        kind: Kind,
        class: String,
    },
    /// `name` is not a variable, so it names a class: no receiver.
    Static,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    class_name: String,
    class: IndexMap<String, Entry>,
    subroutine: IndexMap<String, Entry>,
    counts: [u16; 4],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_class_scope(&mut self, class_name: &str) {
        self.class_name = class_name.to_string();
        self.class.clear();
        self.subroutine.clear();
        self.counts = [0; 4];
    }

    /// Methods get `this` as argument 0, so declared arguments start at 1.
    pub fn start_subroutine_scope(&mut self, is_method: bool) -> Result<(), Error> {
        self.subroutine.clear();
        self.counts[Kind::Argument as usize] = 0;
        self.counts[Kind::Local as usize] = 0;
        if is_method {
            let class_name = self.class_name.clone();
            self.define("this", &class_name, Kind::Argument)?;
        }
        Ok(())
    }

    pub fn define(&mut self, name: &str, ty: &str, kind: Kind) -> Result<u16, Error> {
        let scope = if kind.is_class_level() {
            &mut self.class
        } else {
            &mut self.subroutine
        };
        if scope.contains_key(name) {
            return Err(Error::DuplicateSymbol(name.to_string(), None));
        }
        let index = self.counts[kind as usize];
        scope.insert(
            name.to_string(),
            Entry {
                ty: ty.to_string(),
                kind,
                index,
            },
        );
        self.counts[kind as usize] += 1;
        Ok(index)
    }

    /// Subroutine scope shadows class scope.
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine.get(name).or_else(|| self.class.get(name))
    }

    fn resolve(&self, name: &str) -> Result<&Entry, Error> {
        self.lookup(name)
            .ok_or_else(|| Error::UndeclaredIdentifier(name.to_string(), None))
    }

    pub fn kind_of(&self, name: &str) -> Result<Kind, Error> {
        self.resolve(name).map(|entry| entry.kind)
    }

    pub fn type_of(&self, name: &str) -> Result<&str, Error> {
        self.resolve(name).map(|entry| entry.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Result<u16, Error> {
        self.resolve(name).map(|entry| entry.index)
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        self.counts[kind as usize]
    }

    pub fn dispatch(&self, name: &str) -> Dispatch {
        match self.lookup(name) {
            Some(entry) => Dispatch::Receiver {
                segment: entry.kind.segment(),
                index: entry.index,
                kind: entry.kind,
                class: entry.ty.clone(),
            },
            None => Dispatch::Static,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_count_per_kind() {
        let mut table = SymbolTable::new();
        table.start_class_scope("Point");
        assert_eq!(table.define("x", "int", Kind::Field), Ok(0));
        assert_eq!(table.define("count", "int", Kind::Static), Ok(0));
        assert_eq!(table.define("y", "int", Kind::Field), Ok(1));
        assert_eq!(table.var_count(Kind::Field), 2);
        assert_eq!(table.var_count(Kind::Static), 1);
    }

    #[test]
    fn new_class_resets_everything() {
        let mut table = SymbolTable::new();
        table.start_class_scope("A");
        table.define("x", "int", Kind::Field).unwrap();
        table.start_class_scope("B");
        assert_eq!(table.var_count(Kind::Field), 0);
        assert!(table.lookup("x").is_none());
    }

    #[test]
    fn this_is_typed_by_the_class() {
        let mut table = SymbolTable::new();
        table.start_class_scope("List");
        table.start_subroutine_scope(true).unwrap();
        assert_eq!(table.type_of("this"), Ok("List"));
        assert_eq!(table.index_of("this"), Ok(0));
        table.start_subroutine_scope(false).unwrap();
        assert!(table.lookup("this").is_none());
    }

    #[test]
    fn dispatch_through_field() {
        let mut table = SymbolTable::new();
        table.start_class_scope("Game");
        table.define("ball", "Ball", Kind::Field).unwrap();
        table.start_subroutine_scope(true).unwrap();
        assert_eq!(
            table.dispatch("ball"),
            Dispatch::Receiver {
                segment: Segment::This,
                index: 0,
                kind: Kind::Field,
                class: "Ball".to_string(),
            }
        );
        assert_eq!(table.dispatch("Output"), Dispatch::Static);
    }
}
