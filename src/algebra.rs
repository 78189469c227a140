//! Unary and set operators: project, select, union and minus.
//!
//! Every operator reads its operands and returns a new table; inputs are never
//! modified.

use std::collections::HashSet;

use bitvec::prelude::*;

use crate::error::{Result, TableError};
use crate::key::KeyValue;
use crate::schema::{ColumnDef, Schema, Tuple, extract_columns};
use crate::table::Table;

impl Table {
    /// Projects every tuple onto `attributes`, in the given order.
    ///
    /// Duplicates are kept: the result has exactly as many tuples as this table.
    /// The key is kept when all key attributes are projected, otherwise every
    /// projected attribute becomes part of the key.
    ///
    /// # Errors
    /// [TableError::AttributeNotFound] if an attribute is not in the schema, and
    /// [TableError::DuplicateAttribute] if one is requested twice.
    pub fn project(&self, attributes: &[&str]) -> Result<Table> {
        log::debug!("{}.project({})", self.name(), attributes.join(" "));
        let columns = self.schema().resolve_columns(attributes)?;
        let domains = self.schema().extract_domains(&columns);

        let key_kept = self.key().iter().all(|k| attributes.contains(&k.as_str()));
        let key = if key_kept {
            self.key().to_vec()
        } else {
            attributes.iter().map(|a| a.to_string()).collect()
        };

        let defs = attributes
            .iter()
            .zip(domains)
            .map(|(name, data_type)| ColumnDef::new(*name, data_type))
            .collect();
        let schema = Schema::new(defs, key)?;

        let rows = self
            .tuples()
            .iter()
            .map(|t| extract_columns(t, &columns))
            .collect();
        Ok(Table::derived(self.name(), schema, rows))
    }

    /// Keeps the tuples for which `predicate` holds, in their original order.
    ///
    /// # Example
    /// ```
    /// use reltable::{Table, Value};
    ///
    /// let mut movie = Table::define("movie", "title year", "String Integer", "title").unwrap();
    /// movie.insert(vec!["Star_Wars".into(), 1977.into()]).unwrap();
    /// movie.insert(vec!["Rocky".into(), 1985.into()]).unwrap();
    ///
    /// let year = movie.column_index_of("year").unwrap();
    /// let old = movie.select(|t| t[year] < Value::Integer(1980));
    /// assert_eq!(old.len(), 1);
    /// ```
    pub fn select<F>(&self, predicate: F) -> Table
    where
        F: Fn(&Tuple) -> bool,
    {
        log::debug!("{}.select(<predicate>)", self.name());
        let mask: BitVec = self.tuples().iter().map(|t| predicate(t)).collect();
        self.keep(&mask)
    }

    /// Keeps the tuples whose key value equals `key`.
    ///
    /// All tuples are scanned rather than probing the index, so tuples sharing a
    /// key (which the index cannot tell apart) are all returned.
    pub fn select_key(&self, key: &KeyValue) -> Table {
        log::debug!("{}.select({key})", self.name());
        let mask: BitVec = self
            .tuples()
            .iter()
            .map(|t| self.schema().key_of(t) == *key)
            .collect();
        self.keep(&mask)
    }

    /// Bag union: this table's tuples followed by `other`'s, duplicates kept.
    ///
    /// # Errors
    /// [TableError::SchemaIncompatible] unless both tables have the same arity
    /// and domains.
    pub fn union(&self, other: &Table) -> Result<Table> {
        log::debug!("{}.union({})", self.name(), other.name());
        self.check_compatible(other)?;
        let rows = self
            .tuples()
            .iter()
            .chain(other.tuples())
            .cloned()
            .collect();
        Ok(Table::derived(self.name(), self.schema().clone(), rows))
    }

    /// Difference: the tuples of this table that are not equal, value by value,
    /// to any tuple of `other`. Multiplicity in `other` does not matter.
    ///
    /// # Errors
    /// [TableError::SchemaIncompatible] unless both tables have the same arity
    /// and domains.
    pub fn minus(&self, other: &Table) -> Result<Table> {
        log::debug!("{}.minus({})", self.name(), other.name());
        self.check_compatible(other)?;
        let removed: HashSet<&Tuple> = other.tuples().iter().collect();
        let mask: BitVec = self
            .tuples()
            .iter()
            .map(|t| !removed.contains(t))
            .collect();
        Ok(self.keep(&mask))
    }

    fn check_compatible(&self, other: &Table) -> Result<()> {
        match self.schema().incompatibility(other.schema()) {
            None => Ok(()),
            Some(reason) => {
                log::warn!("{} and {}: {reason}", self.name(), other.name());
                Err(TableError::SchemaIncompatible(reason))
            }
        }
    }

    /// New table with this schema and the tuples whose bit is set in `mask`.
    fn keep(&self, mask: &BitSlice) -> Table {
        let rows = mask
            .iter_ones()
            .map(|pos| self.tuples()[pos].clone())
            .collect();
        Table::derived(self.name(), self.schema().clone(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::value::Value;
    use quickcheck_macros::quickcheck;
    use test_log::test;

    fn film(title: &str, year: i32, length: i32, genre: &str, studio: &str, producer: i32) -> Tuple {
        vec![
            title.into(),
            year.into(),
            length.into(),
            genre.into(),
            studio.into(),
            producer.into(),
        ]
    }

    fn films() -> Vec<Tuple> {
        vec![
            film("Star_Wars", 1977, 124, "sciFi", "Fox", 12345),
            film("Star_Wars_2", 1980, 124, "sciFi", "Fox", 12345),
            film("Rocky", 1985, 200, "action", "Universal", 12125),
            film("Rambo", 1978, 100, "action", "Universal", 32355),
            film("Galaxy_Quest", 1999, 104, "comedy", "DreamWorks", 67890),
        ]
    }

    fn movie_table(name: &str, rows: &[Tuple]) -> Table {
        let mut t = Table::define(
            name,
            "title year length genre studioName producerNo",
            "String Integer Integer String String Integer",
            "title year",
        )
        .unwrap();
        for r in rows {
            t.insert(r.clone()).unwrap();
        }
        t
    }

    fn movie_star() -> Table {
        let mut t = Table::define(
            "movieStar",
            "name address gender birthdate",
            "String String Character String",
            "name",
        )
        .unwrap();
        t.insert(vec!["Carrie_Fisher".into(), "Hollywood".into(), 'F'.into(), "9/9/99".into()])
            .unwrap();
        t.insert(vec!["Mark_Hamill".into(), "Brentwood".into(), 'M'.into(), "8/8/88".into()])
            .unwrap();
        t.insert(vec!["Harrison_Ford".into(), "Beverly_Hills".into(), 'M'.into(), "7/7/77".into()])
            .unwrap();
        t
    }

    // ─────────────────────────────────────────────────────────────
    // project
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_project_keeps_key() {
        let movie = movie_table("movie", &films()[..4]);
        let projected = movie.project(&["title", "year", "genre"]).unwrap();

        let mut expected = Table::define("movie", "title year genre", "String Integer String", "title year")
            .unwrap();
        expected.insert(vec!["Star_Wars".into(), 1977.into(), "sciFi".into()]).unwrap();
        expected.insert(vec!["Star_Wars_2".into(), 1980.into(), "sciFi".into()]).unwrap();
        expected.insert(vec!["Rocky".into(), 1985.into(), "action".into()]).unwrap();
        expected.insert(vec!["Rambo".into(), 1978.into(), "action".into()]).unwrap();

        assert!(expected.equals_ignore_name(&projected));
        assert_eq!(
            projected.domains(),
            vec![DataType::Text, DataType::Integer, DataType::Text]
        );
    }

    #[test]
    fn test_project_new_key() {
        let movie = movie_table("movie", &films()[..4]);
        let projected = movie.project(&["year", "length", "genre", "studioName"]).unwrap();
        assert_eq!(projected.key(), &["year", "length", "genre", "studioName"]);
        assert_eq!(projected.tuples()[0], vec![
            Value::Integer(1977),
            Value::Integer(124),
            Value::from("sciFi"),
            Value::from("Fox"),
        ]);
    }

    #[test]
    fn test_project_keeps_duplicates() {
        let movie = movie_table("movie", &films());
        let studios = movie.project(&["studioName"]).unwrap();
        assert_eq!(studios.len(), 5);
        assert_eq!(
            studios.tuples().iter().filter(|t| t[0] == Value::from("Fox")).count(),
            2
        );
    }

    #[test]
    fn test_project_unknown_attribute() {
        let movie = movie_table("movie", &films());
        assert_eq!(
            movie.project(&["title", "rating"]).unwrap_err(),
            TableError::AttributeNotFound("rating".into())
        );
    }

    // ─────────────────────────────────────────────────────────────
    // select
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_select_predicate_preserves_order() {
        let movie = movie_table("movie", &films());
        let genre = movie.column_index_of("genre").unwrap();
        let action = movie.select(|t| t[genre] == Value::from("action"));

        assert_eq!(action.len(), 2);
        assert_eq!(action.tuples()[0][0], Value::from("Rocky"));
        assert_eq!(action.tuples()[1][0], Value::from("Rambo"));
        assert_eq!(action.attributes(), movie.attributes());
        // input untouched
        assert_eq!(movie.len(), 5);
    }

    #[test]
    fn test_select_key() {
        let stars = movie_star();
        let selected = stars.select_key(&KeyValue::from("Carrie_Fisher"));

        let mut expected = Table::define(
            "movieStar",
            "name address gender birthdate",
            "String String Character String",
            "name",
        )
        .unwrap();
        expected
            .insert(vec!["Carrie_Fisher".into(), "Hollywood".into(), 'F'.into(), "9/9/99".into()])
            .unwrap();

        assert!(expected.equals_ignore_name(&selected));
        assert_eq!(selected.len(), 1);
        assert!(stars.select_key(&KeyValue::from("Nobody")).is_empty());
    }

    #[test]
    fn test_select_composite_key_compares_every_column() {
        let mut rows = films();
        rows.push(film("Rocky", 1990, 111, "action", "MGM", 1));
        let movie = movie_table("movie", &rows);

        let key = KeyValue::new(vec!["Rocky".into(), 1990.into()]);
        let selected = movie.select_key(&key);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.tuples()[0][4], Value::from("MGM"));
    }

    #[test]
    fn test_select_key_returns_every_duplicate() {
        let rows = films();
        let movie = movie_table("movie", &[rows[2].clone(), rows[2].clone()]);
        let key = KeyValue::new(vec!["Rocky".into(), 1985.into()]);
        assert_eq!(movie.select_key(&key).len(), 2);
    }

    // ─────────────────────────────────────────────────────────────
    // union / minus
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_union_is_bag_concatenation() {
        let rows = films();
        let movie = movie_table("movie", &rows[..4]);
        let cinema = movie_table("cinema", &rows[2..]);

        let union = movie.union(&cinema).unwrap();
        let expected: Vec<Tuple> = rows[..4].iter().chain(&rows[2..]).cloned().collect();
        assert_eq!(union.tuples(), expected.as_slice());
        assert_eq!(union.len(), 7);
    }

    #[test]
    fn test_union_incompatible() {
        let movie = movie_table("movie", &films());
        let result = movie.union(&movie_star());
        assert!(matches!(result, Err(TableError::SchemaIncompatible(_))));
    }

    #[test]
    fn test_minus() {
        let rows = films();
        let movie = movie_table("movie", &rows[..4]);
        let cinema = movie_table("cinema", &rows[2..]);

        let diff = movie.minus(&cinema).unwrap();
        assert_eq!(diff.tuples(), &rows[..2]);

        let result = movie.minus(&movie_star());
        assert!(matches!(result, Err(TableError::SchemaIncompatible(_))));
    }

    #[test]
    fn test_minus_ignores_multiplicity() {
        let rows = films();
        let movie = movie_table("movie", &[rows[0].clone(), rows[1].clone()]);
        let other = movie_table("other", &[rows[0].clone(), rows[0].clone()]);
        let diff = movie.minus(&other).unwrap();
        assert_eq!(diff.tuples(), &rows[1..2]);
    }

    #[test]
    fn test_minus_compares_whole_tuples() {
        let rows = films();
        let movie = movie_table("movie", &rows[..1]);
        // same key, different length
        let other = movie_table("other", &[film("Star_Wars", 1977, 125, "sciFi", "Fox", 12345)]);
        assert_eq!(movie.minus(&other).unwrap().len(), 1);
    }

    // ─────────────────────────────────────────────────────────────
    // properties
    // ─────────────────────────────────────────────────────────────
    fn pairs(name: &str, rows: &[(i8, i8)]) -> Table {
        let mut t = Table::define(name, "a b", "Byte Byte", "a").unwrap();
        for &(a, b) in rows {
            t.insert(vec![a.into(), b.into()]).unwrap();
        }
        t
    }

    #[quickcheck]
    fn union_length_is_sum(left: Vec<(i8, i8)>, right: Vec<(i8, i8)>) -> bool {
        let (l, r) = (pairs("l", &left), pairs("r", &right));
        l.union(&r).unwrap().len() == left.len() + right.len()
    }

    #[quickcheck]
    fn minus_removes_every_shared_tuple(left: Vec<(i8, i8)>, right: Vec<(i8, i8)>) -> bool {
        let (l, r) = (pairs("l", &left), pairs("r", &right));
        let diff = l.minus(&r).unwrap();
        diff.tuples().iter().all(|t| !r.tuples().contains(t))
            && diff.len() == left.iter().filter(|&p| !right.contains(p)).count()
    }

    #[quickcheck]
    fn project_is_a_bag_map(rows: Vec<(i8, i8)>) -> bool {
        let t = pairs("t", &rows);
        let p = t.project(&["b"]).unwrap();
        p.len() == rows.len()
            && p.tuples()
                .iter()
                .zip(&rows)
                .all(|(t, &(_, b))| t == &vec![Value::Byte(b)])
    }
}
