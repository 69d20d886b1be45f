use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EmployeeRecord;

pub const DEFAULT_TOP_PERFORMERS: usize = 5;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopPerformer {
    pub rank: u32,
    pub name: String,
    pub entries: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentStats {
    pub department: String,
    pub employee_count: u64,
    pub total_entries: u64,
}

/// Aggregate numbers shown on the dashboard.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub total_entries: u64,
    pub eligible_participants: u64,
    pub top_performers: Vec<TopPerformer>,
    pub department_stats: Vec<DepartmentStats>,
}

impl DashboardStats {
    /// Computes the statistics of a roster.
    ///
    /// Top performers are the employees with entries, the most entries first (ties broken by
    /// name), limited to `top_n`. Employees without a department are not part of the
    /// department breakdown. Entry totals saturate at `u64::MAX`.
    pub fn from_employees(employees: &[EmployeeRecord], top_n: usize) -> DashboardStats {
        let total_entries: u64 = employees
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.total_entries));

        let mut performers: Vec<&EmployeeRecord> =
            employees.iter().filter(|e| e.total_entries > 0).collect();
        let eligible_participants = performers.len() as u64;
        performers.sort_by(|a, b| {
            b.total_entries
                .cmp(&a.total_entries)
                .then_with(|| a.name.cmp(&b.name))
        });
        let top_performers: Vec<TopPerformer> = performers
            .iter()
            .take(top_n)
            .enumerate()
            .map(|(idx, e)| TopPerformer {
                rank: (idx + 1) as u32,
                name: e.name.clone(),
                entries: e.total_entries,
            })
            .collect();

        let mut by_department: HashMap<String, DepartmentStats> = HashMap::new();
        for e in employees.iter() {
            if let Some(dep) = e.department.as_ref().filter(|d| !d.is_empty()) {
                let ds = by_department
                    .entry(dep.clone())
                    .or_insert_with(|| DepartmentStats {
                        department: dep.clone(),
                        employee_count: 0,
                        total_entries: 0,
                    });
                ds.employee_count += 1;
                ds.total_entries = ds.total_entries.saturating_add(e.total_entries);
            }
        }
        let mut department_stats: Vec<DepartmentStats> = by_department.into_values().collect();
        department_stats.sort_by(|a, b| {
            b.total_entries
                .cmp(&a.total_entries)
                .then_with(|| a.department.cmp(&b.department))
        });
        debug!("from_employees: departments: {:?}", department_stats);

        DashboardStats {
            total_employees: employees.len() as u64,
            total_entries,
            eligible_participants,
            top_performers,
            department_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(name: &str, entries: u64, dep: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            id: name.to_lowercase(),
            name: name.to_string(),
            total_entries: entries,
            department: dep.map(|s| s.to_string()),
        }
    }

    #[test]
    fn empty_roster() {
        let stats = DashboardStats::from_employees(&[], DEFAULT_TOP_PERFORMERS);
        assert_eq!(stats.total_employees, 0);
        assert_eq!(stats.total_entries, 0);
        assert!(stats.top_performers.is_empty());
        assert!(stats.department_stats.is_empty());
    }

    #[test]
    fn top_performers_and_departments() {
        let roster = vec![
            e("Zoe", 4, Some("Care")),
            e("Anna", 4, Some("Office")),
            e("Bob", 10, Some("Care")),
            e("Clara", 0, Some("Office")),
            e("Dan", 1, None),
            e("Eve", 2, Some("")),
        ];
        let stats = DashboardStats::from_employees(&roster, 3);
        assert_eq!(stats.total_employees, 6);
        assert_eq!(stats.total_entries, 21);
        assert_eq!(stats.eligible_participants, 5);
        assert_eq!(
            stats.top_performers,
            vec![
                TopPerformer {
                    rank: 1,
                    name: "Bob".to_string(),
                    entries: 10
                },
                TopPerformer {
                    rank: 2,
                    name: "Anna".to_string(),
                    entries: 4
                },
                TopPerformer {
                    rank: 3,
                    name: "Zoe".to_string(),
                    entries: 4
                },
            ]
        );
        assert_eq!(
            stats.department_stats,
            vec![
                DepartmentStats {
                    department: "Care".to_string(),
                    employee_count: 2,
                    total_entries: 14
                },
                DepartmentStats {
                    department: "Office".to_string(),
                    employee_count: 2,
                    total_entries: 4
                },
            ]
        );
    }

    #[test]
    fn entry_totals_saturate() {
        let roster = vec![
            e("Anna", u64::MAX, Some("Care")),
            e("Bob", 3, Some("Care")),
            e("Clara", 1, None),
        ];
        let stats = DashboardStats::from_employees(&roster, DEFAULT_TOP_PERFORMERS);
        assert_eq!(stats.total_entries, u64::MAX);
        assert_eq!(stats.department_stats[0].total_entries, u64::MAX);
        assert_eq!(stats.department_stats[0].employee_count, 2);
        assert_eq!(stats.top_performers[0].name, "Anna");
    }
}
