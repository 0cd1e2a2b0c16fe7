//! Lookup tables over a snapshot

use std::collections::HashMap;
use tracing::warn;

use crate::core::Snapshot;
use crate::entities::{Employee, Part};

/// Employee-by-id and part-by-reference lookups
///
/// Built in one pass per collection. When a key repeats, the later record
/// wins; the repeated keys are kept in `duplicate_*` for validation.
#[derive(Debug, Default)]
pub struct DataIndex<'a> {
    employees: HashMap<&'a str, &'a Employee>,
    parts: HashMap<&'a str, &'a Part>,
    duplicate_employees: Vec<&'a str>,
    duplicate_parts: Vec<&'a str>,
}

impl<'a> DataIndex<'a> {
    pub fn build(snapshot: &'a Snapshot) -> Self {
        Self::from_collections(&snapshot.employees, &snapshot.parts)
    }

    pub fn from_collections(employees: &'a [Employee], parts: &'a [Part]) -> Self {
        let mut index = DataIndex::default();

        for employee in employees {
            let key = employee.id.trim();
            if index.employees.insert(key, employee).is_some() && !index.duplicate_employees.contains(&key) {
                warn!(id = key, "duplicate employee id, keeping the last record");
                index.duplicate_employees.push(key);
            }
        }

        for part in parts {
            let key = part.key();
            if index.parts.insert(key, part).is_some() && !index.duplicate_parts.contains(&key) {
                warn!(reference = key, "duplicate part reference, keeping the last record");
                index.duplicate_parts.push(key);
            }
        }

        index
    }

    pub fn employee(&self, id: &str) -> Option<&'a Employee> {
        self.employees.get(id.trim()).copied()
    }

    pub fn part(&self, reference: &str) -> Option<&'a Part> {
        self.parts.get(reference.trim()).copied()
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Employee ids that appeared more than once, in first-repeat order
    pub fn duplicate_employees(&self) -> &[&'a str] {
        &self.duplicate_employees
    }

    /// Part references that appeared more than once, in first-repeat order
    pub fn duplicate_parts(&self) -> &[&'a str] {
        &self.duplicate_parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index() {
        let snapshot = Snapshot::default();
        let index = DataIndex::build(&snapshot);
        assert_eq!(index.employee_count(), 0);
        assert_eq!(index.part_count(), 0);
        assert!(index.part("P1").is_none());
    }

    #[test]
    fn test_lookup_trims_keys() {
        let parts = vec![Part::new(" P1 ", "Panel", 3)];
        let index = DataIndex::from_collections(&[], &parts);
        assert_eq!(index.part("P1").map(|p| p.quantity), Some(3));
        assert_eq!(index.part("P1  ").map(|p| p.quantity), Some(3));
        assert!(index.part("p1").is_none());
    }

    #[test]
    fn test_last_write_wins_and_duplicates_recorded() {
        let employees = vec![
            Employee::new("E1", "Ana", "A"),
            Employee::new("E1", "Bob", "B"),
            Employee::new("E1", "Cyd", "C"),
        ];
        let parts = vec![Part::new("P1", "First", 1), Part::new("P1", "Second", 2)];
        let index = DataIndex::from_collections(&employees, &parts);

        assert_eq!(index.employee("E1").map(|e| e.first_name.as_str()), Some("Cyd"));
        assert_eq!(index.part("P1").map(|p| p.designation.as_str()), Some("Second"));
        assert_eq!(index.duplicate_employees(), &["E1"]);
        assert_eq!(index.duplicate_parts(), &["P1"]);
        assert_eq!(index.employee_count(), 1);
    }
}
