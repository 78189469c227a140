use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use allocative::Allocative;

use crate::data_type::DataType;
use crate::error::{Result, TableError};
use crate::key::KeyValue;
use crate::schema::{ColumnDef, Schema, Tuple};

/// Counter for naming derived tables.
static DERIVED_COUNT: AtomicUsize = AtomicUsize::new(0);

/// A relational table: a schema, an insertion-ordered bag of tuples and a
/// primary-key index.
///
/// The index maps each key value to the position of the tuple that owns it.
/// Keys are not enforced unique; inserting a duplicate key replaces the index
/// entry while both tuples stay in the store.
#[derive(Debug, Clone, Allocative)]
pub struct Table {
    name: String,
    schema: Schema,
    tuples: Vec<Tuple>,
    index: BTreeMap<KeyValue, usize>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            tuples: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Creates an empty table from whitespace-separated attribute names, domain
    /// names and key attributes.
    ///
    /// # Example
    /// ```
    /// use reltable::{Table, Value};
    ///
    /// let mut student = Table::define("student", "name id year gpa", "String Integer String Double", "id").unwrap();
    /// student
    ///     .insert(vec!["Fred".into(), 0.into(), "Freshman".into(), 3.5.into()])
    ///     .unwrap();
    ///
    /// assert_eq!(student.len(), 1);
    /// assert_eq!(student.column_index_of("gpa"), Some(3));
    /// assert!(student.insert(vec![Value::from("Sally")]).is_err());
    /// ```
    pub fn define(name: &str, attributes: &str, domains: &str, key: &str) -> Result<Self> {
        let attributes: Vec<&str> = attributes.split_whitespace().collect();
        let domains = domains
            .split_whitespace()
            .map(str::parse::<DataType>)
            .collect::<Result<Vec<_>>>()?;
        let key = key.split_whitespace().map(String::from).collect();
        let schema = Schema::from_parts(attributes, domains, key)?;
        log::debug!("create table {name} ({})", schema.attributes().join(" "));
        Ok(Self::new(name, schema))
    }

    /// Builds a fully formed derived table and indexes its tuples. The tuples
    /// must already conform to `schema`.
    pub(crate) fn derived(source: &str, schema: Schema, tuples: Vec<Tuple>) -> Self {
        let n = DERIVED_COUNT.fetch_add(1, Ordering::Relaxed);
        let mut table = Self {
            name: format!("{source}{n}"),
            schema,
            tuples,
            index: BTreeMap::new(),
        };
        table.rebuild_index();
        table
    }

    pub(crate) fn rebuild_index(&mut self) {
        self.index = self
            .tuples
            .iter()
            .enumerate()
            .map(|(pos, t)| (self.schema.key_of(t), pos))
            .collect();
    }

    /// Inserts a tuple and indexes it under its key value.
    ///
    /// # Errors
    /// Returns a type error if the tuple's arity or any value's kind disagrees
    /// with the schema. The table is left unchanged in that case.
    pub fn insert(&mut self, tuple: Tuple) -> Result<()> {
        log::trace!("insert into {} values {:?}", self.name, tuple);
        if let Err(e) = self.schema.type_check(&tuple) {
            log::warn!("insert into {} rejected: {e}", self.name);
            return Err(e);
        }
        let key = self.schema.key_of(&tuple);
        self.tuples.push(tuple);
        self.index.insert(key, self.tuples.len() - 1);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn attributes(&self) -> Vec<&str> {
        self.schema.attributes()
    }

    pub fn domains(&self) -> Vec<DataType> {
        self.schema.domains()
    }

    pub fn key(&self) -> &[String] {
        self.schema.key()
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn column_index_of(&self, attribute: &str) -> Option<usize> {
        self.schema.column_index_of(attribute)
    }

    /// Looks up the tuple currently indexed under `key`.
    pub fn get(&self, key: &KeyValue) -> Option<&Tuple> {
        self.index.get(key).map(|&pos| &self.tuples[pos])
    }

    /// Index entries in key order.
    pub fn index_entries(&self) -> impl Iterator<Item = (&KeyValue, &Tuple)> + '_ {
        self.index.iter().map(|(k, &pos)| (k, &self.tuples[pos]))
    }

    /// Heap bytes owned by this table (tuples, index and schema).
    pub fn allocated_bytes(&self) -> usize {
        allocative::size_of_unique_allocated_data(self)
    }

    /// Structural equality: same attributes, same key and the same set of
    /// tuples. Order and multiplicity of tuples are ignored, and so is the name.
    pub fn equals_ignore_name(&self, other: &Table) -> bool {
        if self.attributes() != other.attributes() || self.key() != other.key() {
            return false;
        }
        let these: HashSet<&Tuple> = self.tuples.iter().collect();
        let those: HashSet<&Tuple> = other.tuples.iter().collect();
        these == those
    }
}

/// Strict equality: [Table::equals_ignore_name] plus equal names.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.equals_ignore_name(other)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 15;
        let rule = format!("|-{}-|", "-".repeat(WIDTH * self.schema.arity()));
        writeln!(f, " Table {}", self.name)?;
        writeln!(f, "{rule}")?;
        f.write_str("| ")?;
        for ColumnDef { name, .. } in self.schema.columns() {
            write!(f, "{name:>WIDTH$}")?;
        }
        writeln!(f, " |")?;
        writeln!(f, "{rule}")?;
        for tuple in &self.tuples {
            f.write_str("| ")?;
            for value in tuple {
                write!(f, "{:>WIDTH$}", value.to_string())?;
            }
            writeln!(f, " |")?;
        }
        write!(f, "{rule}")
    }
}

impl TryFrom<(&str, Vec<ColumnDef>, Vec<String>)> for Table {
    type Error = TableError;

    fn try_from((name, columns, key): (&str, Vec<ColumnDef>, Vec<String>)) -> Result<Self> {
        Ok(Self::new(name, Schema::new(columns, key)?))
    }
}
