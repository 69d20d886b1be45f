pub use crate::config::*;
use crate::RaffleSession;
use log::debug;

/// A builder for turning an employee roster into a raffle session.
///
/// Employees without entries are kept in the roster but are not eligible for the draw.
///
/// ```
/// pub use raffle_engine::builder::Builder;
/// # use raffle_engine::RaffleErrors;
///
/// let mut builder = Builder::new();
/// builder.add_employee("1", "Anna", 3);
/// builder.add_employee("2", "Bob", 0);
///
/// let session = builder.session()?;
/// assert_eq!(session.participants().len(), 1);
/// assert_eq!(session.total_weight(), 3);
///
/// # Ok::<(), RaffleErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _employees: Vec<EmployeeRecord>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _employees: Vec::new(),
        }
    }

    pub fn employees(self, records: &[EmployeeRecord]) -> Builder {
        let mut res = self;
        res._employees.extend(records.iter().cloned());
        res
    }

    /// Adds an employee. It is the simplest use case for most cases.
    pub fn add_employee(&mut self, id: &str, name: &str, total_entries: u64) {
        self.add_record(&EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            total_entries,
            department: None,
        })
    }

    pub fn add_record(&mut self, record: &EmployeeRecord) {
        self._employees.push(record.clone());
    }

    pub fn roster(&self) -> &[EmployeeRecord] {
        &self._employees
    }

    /// The employees with at least one entry, in roster order.
    pub fn participants(&self) -> Vec<Participant> {
        self._employees
            .iter()
            .filter_map(|e| {
                if e.total_entries > 0 {
                    Some(Participant {
                        id: e.id.clone(),
                        name: e.name.clone(),
                        weight: e.total_entries,
                    })
                } else {
                    debug!("participants: {:?} has no entries, skipping", e.name);
                    None
                }
            })
            .collect()
    }

    pub fn session(&self) -> Result<RaffleSession, RaffleErrors> {
        RaffleSession::new(self.participants())
    }
}
