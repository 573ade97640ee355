use crate::api::{CreateRecordRequest, DnsRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Keep(String),
    Delete(String),
    Create(CreateRecordRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub actions: Vec<Action>,
}

impl Plan {
    pub fn kept(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            Action::Keep(id) => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn deletions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().filter_map(|action| match action {
            Action::Delete(id) => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn creation(&self) -> Option<&CreateRecordRequest> {
        self.actions.iter().find_map(|action| match action {
            Action::Create(request) => Some(request),
            _ => None,
        })
    }

    /// True when applying the plan issues no provider calls.
    pub fn is_noop(&self) -> bool {
        self.actions
            .iter()
            .all(|action| matches!(action, Action::Keep(_)))
    }
}

/// Decides what to do with the existing A records for `dns_name`.
///
/// Records are scanned in the order given. The first one whose content equals
/// `target_ip` is kept; every other record is deleted, including later ones
/// that also carry `target_ip`. When nothing is kept, a new A record is
/// planned after the deletions.
pub fn reconcile(dns_name: &str, target_ip: &str, records: &[DnsRecord]) -> Plan {
    let mut actions = Vec::with_capacity(records.len() + 1);
    let mut valid_exists = false;

    for record in records {
        if record.content != target_ip || valid_exists {
            actions.push(Action::Delete(record.id.clone()));
        } else {
            actions.push(Action::Keep(record.id.clone()));
            valid_exists = true;
        }
    }

    if !valid_exists {
        actions.push(Action::Create(CreateRecordRequest::a_record(
            dns_name, target_ip,
        )));
    }

    Plan { actions }
}
