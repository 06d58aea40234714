//! Roster filtering and ordering.

use crate::models::StudentRecord;
use std::cmp::Ordering;

/// Ordering applied to a roster listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Class ascending, then name.
    #[default]
    Class,
    /// Name ascending, case-insensitive.
    Name,
    /// BMI descending.
    Bmi,
}

/// Records belonging to one class, in input order.
pub fn filter_by_class(students: &[StudentRecord], class_number: u8) -> Vec<&StudentRecord> {
    students
        .iter()
        .filter(|s| s.class_number() == class_number)
        .collect()
}

/// Sort records in place. The sort is stable.
pub fn sort_records(students: &mut [&StudentRecord], key: SortKey) {
    match key {
        SortKey::Class => students.sort_by(|a, b| {
            a.class_number()
                .cmp(&b.class_number())
                .then_with(|| compare_names(a, b))
        }),
        SortKey::Name => students.sort_by(|a, b| compare_names(a, b)),
        SortKey::Bmi => students.sort_by(|a, b| b.bmi().total_cmp(&a.bmi())),
    }
}

/// Filtered and sorted view of the roster.
pub fn roster(
    students: &[StudentRecord],
    class_filter: Option<u8>,
    key: SortKey,
) -> Vec<&StudentRecord> {
    let mut view = match class_filter {
        Some(class_number) => filter_by_class(students, class_number),
        None => students.iter().collect(),
    };
    sort_records(&mut view, key);
    view
}

fn compare_names(a: &StudentRecord, b: &StudentRecord) -> Ordering {
    a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::record;

    fn names(view: &[&StudentRecord]) -> Vec<String> {
        view.iter().map(|s| s.name().to_string()).collect()
    }

    fn sample() -> Vec<StudentRecord> {
        vec![
            record("priya", 3, 21.0),
            record("Arjun", 5, 27.4),
            record("Dev", 3, 16.9),
            record("bela", 1, 31.2),
        ]
    }

    #[test]
    fn test_filter_by_class() {
        let students = sample();
        let class_three = filter_by_class(&students, 3);

        assert_eq!(names(&class_three), vec!["priya", "Dev"]);
        assert!(filter_by_class(&students, 9).is_empty());
    }

    #[test]
    fn test_sort_by_class_then_name() {
        let students = sample();
        let view = roster(&students, None, SortKey::Class);

        assert_eq!(names(&view), vec!["bela", "Dev", "priya", "Arjun"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let students = sample();
        let view = roster(&students, None, SortKey::Name);

        assert_eq!(names(&view), vec!["Arjun", "bela", "Dev", "priya"]);
    }

    #[test]
    fn test_sort_by_bmi_descending() {
        let students = sample();
        let view = roster(&students, None, SortKey::Bmi);

        assert_eq!(names(&view), vec!["bela", "Arjun", "priya", "Dev"]);
    }

    #[test]
    fn test_filter_then_sort() {
        let students = sample();
        let view = roster(&students, Some(3), SortKey::Bmi);

        assert_eq!(names(&view), vec!["priya", "Dev"]);
    }
}
