//! Unit tests for the ticket ledger against an in-memory store

use super::*;
use crate::domain::{EntityKind, LedgerWarning, Ticket};
use crate::error::{AppError, Result};
use crate::port::{CapacityChange, Transaction};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Default)]
struct Snapshot {
    attendees: HashMap<AttendeeId, Vec<Ticket>>,
    stages: HashMap<StageId, i64>,
}

#[derive(Default)]
struct MemoryStore {
    committed: Arc<Mutex<Snapshot>>,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
    abandoned: Arc<AtomicUsize>,
    stall_on_begin: bool,
    stall_on_push: bool,
    fail_commit: bool,
}

impl MemoryStore {
    fn with_records(attendees: &[&str], stages: &[(&str, i64)]) -> Self {
        let mut snapshot = Snapshot::default();
        for a in attendees {
            snapshot.attendees.insert(AttendeeId::new(*a), Vec::new());
        }
        for (s, capacity) in stages {
            snapshot.stages.insert(StageId::new(*s), *capacity);
        }
        Self {
            committed: Arc::new(Mutex::new(snapshot)),
            ..Default::default()
        }
    }

    fn tickets(&self, attendee: &str) -> Vec<Ticket> {
        self.committed.lock().unwrap().attendees[&AttendeeId::new(attendee)].clone()
    }

    fn capacity(&self, stage: &str) -> i64 {
        self.committed.lock().unwrap().stages[&StageId::new(stage)]
    }

    fn seed_ticket(&self, attendee: &str, ticket: Ticket) {
        self.committed
            .lock()
            .unwrap()
            .attendees
            .get_mut(&AttendeeId::new(attendee))
            .unwrap()
            .push(ticket);
    }
}

struct MemoryTransaction {
    working: Snapshot,
    committed: Arc<Mutex<Snapshot>>,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
    abandoned: Arc<AtomicUsize>,
    stall_on_push: bool,
    fail_commit: bool,
    settled: bool,
}

// Dropped without commit or rollback
impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.settled {
            self.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl TransactionalLedgerStore for MemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn LedgerTransaction>> {
        if self.stall_on_begin {
            std::future::pending::<()>().await;
        }
        let working = self.committed.lock().unwrap().clone();
        Ok(Box::new(MemoryTransaction {
            working,
            committed: Arc::clone(&self.committed),
            commits: Arc::clone(&self.commits),
            rollbacks: Arc::clone(&self.rollbacks),
            abandoned: Arc::clone(&self.abandoned),
            stall_on_push: self.stall_on_push,
            fail_commit: self.fail_commit,
            settled: false,
        }))
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.settled = true;
        if self.fail_commit {
            return Err(AppError::Conflict("write conflict".to_string()));
        }
        *self.committed.lock().unwrap() = self.working.clone();
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.settled = true;
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl LedgerTransaction for MemoryTransaction {
    async fn attendee_exists(&mut self, attendee: &AttendeeId) -> Result<bool> {
        Ok(self.working.attendees.contains_key(attendee))
    }

    async fn adjust_capacity(&mut self, stage: &StageId, delta: i64) -> Result<CapacityChange> {
        Ok(match self.working.stages.get_mut(stage) {
            Some(capacity) if *capacity + delta < 0 => CapacityChange::Insufficient {
                capacity: *capacity,
            },
            Some(capacity) => {
                *capacity += delta;
                CapacityChange::Applied {
                    capacity: *capacity,
                }
            }
            None => CapacityChange::StageMissing,
        })
    }

    async fn push_ticket(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<bool> {
        if self.stall_on_push {
            std::future::pending::<()>().await;
        }
        match self.working.attendees.get_mut(attendee) {
            Some(tickets) => {
                tickets.push(ticket.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_tickets(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<u64> {
        Ok(self
            .working
            .attendees
            .get(attendee)
            .map(|tickets| tickets.iter().filter(|t| *t == ticket).count() as u64)
            .unwrap_or(0))
    }

    async fn pull_ticket(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<bool> {
        let Some(tickets) = self.working.attendees.get_mut(attendee) else {
            return Ok(false);
        };
        match tickets.iter().position(|t| t == ticket) {
            Some(index) => {
                tickets.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn festival_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 25).unwrap()
}

fn ledger_over(store: MemoryStore, config: LedgerConfig) -> (TicketLedger, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let ledger = TicketLedger::new(store.clone(), config);
    (ledger, store)
}

#[tokio::test]
async fn test_purchase_appends_ticket_and_decrements_capacity() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 50)]),
        LedgerConfig::default(),
    );

    let receipt = ledger
        .purchase_ticket(&"juan".into(), &"principal".into(), festival_day())
        .await
        .unwrap();

    assert!(receipt.is_committed());
    assert_eq!(receipt.capacity_after, 49);
    assert_eq!(store.capacity("principal"), 49);
    assert_eq!(
        store.tickets("juan"),
        vec![Ticket::new("principal".into(), festival_day())]
    );
    assert_eq!(store.commits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_purchase_then_reverse_restores_state() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 50)]),
        LedgerConfig::default(),
    );
    let attendee = AttendeeId::new("juan");
    let stage = StageId::new("principal");

    ledger
        .purchase_ticket(&attendee, &stage, festival_day())
        .await
        .unwrap();
    let receipt = ledger
        .reverse_ticket(&attendee, &stage, festival_day(), 1)
        .await
        .unwrap();

    assert_eq!(receipt.operation, LedgerOperation::Reversal);
    assert_eq!(receipt.warning, None);
    assert_eq!(store.capacity("principal"), 50);
    assert!(store.tickets("juan").is_empty());
}

#[tokio::test]
async fn test_purchase_unknown_stage_rolls_back() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 50)]),
        LedgerConfig::default(),
    );

    let err = ledger
        .purchase_ticket(&"juan".into(), &"ghost".into(), festival_day())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::NotFound {
            entity: EntityKind::Stage,
            ..
        }
    ));
    assert!(store.tickets("juan").is_empty());
    assert_eq!(store.rollbacks.load(Ordering::SeqCst), 1);
    assert_eq!(store.commits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_purchase_unknown_attendee_is_not_found() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&[], &[("principal", 5)]),
        LedgerConfig::default(),
    );

    let err = ledger
        .purchase_ticket(&"nobody".into(), &"principal".into(), festival_day())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::NotFound {
            entity: EntityKind::Attendee,
            ..
        }
    ));
    assert_eq!(store.capacity("principal"), 5);
}

#[tokio::test]
async fn test_sold_out_stage_rejects_purchase() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("caribe", 0)]),
        LedgerConfig::default(),
    );

    let err = ledger
        .purchase_ticket(&"juan".into(), &"caribe".into(), festival_day())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::CapacityExhausted { .. }));
    assert_eq!(store.capacity("caribe"), 0);
    assert!(store.tickets("juan").is_empty());
}

#[tokio::test]
async fn test_reverse_applies_caller_delta() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("alterno", 10)]),
        LedgerConfig::default(),
    );
    store.seed_ticket("juan", Ticket::new("alterno".into(), festival_day()));

    let receipt = ledger
        .reverse_ticket(&"juan".into(), &"alterno".into(), festival_day(), 105)
        .await
        .unwrap();

    assert_eq!(receipt.capacity_after, 115);
    assert_eq!(store.capacity("alterno"), 115);
}

#[tokio::test]
async fn test_reverse_without_matching_ticket_is_not_found() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 49)]),
        LedgerConfig::default(),
    );

    let err = ledger
        .reverse_ticket(&"juan".into(), &"principal".into(), festival_day(), 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::NotFound {
            entity: EntityKind::Ticket,
            ..
        }
    ));
    assert_eq!(store.capacity("principal"), 49);
}

#[tokio::test]
async fn test_ambiguous_reversal_removes_one_and_warns() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 48)]),
        LedgerConfig::default(),
    );
    let ticket = Ticket::new("principal".into(), festival_day());
    store.seed_ticket("juan", ticket.clone());
    store.seed_ticket("juan", ticket.clone());

    let receipt = ledger
        .reverse_ticket(&"juan".into(), &"principal".into(), festival_day(), 1)
        .await
        .unwrap();

    assert_eq!(
        receipt.warning,
        Some(LedgerWarning::ReversalAmbiguous { matches: 2 })
    );
    assert_eq!(store.tickets("juan"), vec![ticket]);
    assert_eq!(store.capacity("principal"), 49);
}

#[tokio::test]
async fn test_strict_reversal_aborts_on_ambiguity() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 48)]),
        LedgerConfig::default().strict(),
    );
    let ticket = Ticket::new("principal".into(), festival_day());
    store.seed_ticket("juan", ticket.clone());
    store.seed_ticket("juan", ticket);

    let err = ledger
        .reverse_ticket(&"juan".into(), &"principal".into(), festival_day(), 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::ReversalAmbiguous { matches: 2, .. }
    ));
    assert_eq!(store.tickets("juan").len(), 2);
    assert_eq!(store.capacity("principal"), 48);
}

#[tokio::test]
async fn test_negative_delta_cannot_drop_below_zero() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 1)]),
        LedgerConfig::default(),
    );
    store.seed_ticket("juan", Ticket::new("principal".into(), festival_day()));

    let err = ledger
        .reverse_ticket(&"juan".into(), &"principal".into(), festival_day(), -2)
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::CapacityExhausted { .. }));
    assert_eq!(store.tickets("juan").len(), 1);
}

#[tokio::test]
async fn test_commit_conflict_is_retryable_and_leaves_no_state() {
    let mut memory = MemoryStore::with_records(&["juan"], &[("principal", 3)]);
    memory.fail_commit = true;
    let (ledger, store) = ledger_over(memory, LedgerConfig::default());

    let err = ledger
        .purchase_ticket(&"juan".into(), &"principal".into(), festival_day())
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(store.capacity("principal"), 3);
    assert!(store.tickets("juan").is_empty());
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_purchase() {
    let mut memory = MemoryStore::with_records(&["juan"], &[("principal", 3)]);
    memory.stall_on_push = true;
    let (ledger, store) = ledger_over(memory, LedgerConfig::default());
    let (handle, token) = cancel_channel();

    let req = PurchaseRequest::new("juan".into(), "principal".into(), festival_day());
    let purchase = ledger.purchase_ticket_with_cancel(req, token);
    let trigger = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    };

    let (result, _) = tokio::join!(purchase, trigger);

    assert!(matches!(result, Err(LedgerError::Cancelled)));
    assert_eq!(store.capacity("principal"), 3);
    assert_eq!(store.abandoned.load(Ordering::SeqCst), 1);
    assert_eq!(store.commits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_already_cancelled_token_skips_transaction() {
    let (ledger, store) = ledger_over(
        MemoryStore::with_records(&["juan"], &[("principal", 3)]),
        LedgerConfig::default(),
    );
    let (handle, token) = cancel_channel();
    handle.cancel();

    let req = ReversalRequest::new("juan".into(), "principal".into(), festival_day(), 1);
    let err = ledger
        .reverse_ticket_with_cancel(req, token)
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::Cancelled));
    assert_eq!(store.rollbacks.load(Ordering::SeqCst), 0);
    assert_eq!(store.commits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deadline_aborts_stalled_purchase() {
    let mut memory = MemoryStore::with_records(&["juan"], &[("principal", 3)]);
    memory.stall_on_push = true;
    let (ledger, store) = ledger_over(
        memory,
        LedgerConfig::default().with_deadline(Duration::from_millis(30)),
    );

    let err = ledger
        .purchase_ticket(&"juan".into(), &"principal".into(), festival_day())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::DeadlineExceeded { deadline_ms: 30 }
    ));
    assert_eq!(store.capacity("principal"), 3);
    assert_eq!(store.abandoned.load(Ordering::SeqCst), 1);
    assert_eq!(store.rollbacks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deadline_covers_stalled_begin() {
    let mut memory = MemoryStore::with_records(&["juan"], &[("principal", 3)]);
    memory.stall_on_begin = true;
    let (ledger, store) = ledger_over(
        memory,
        LedgerConfig::default().with_deadline(Duration::from_millis(30)),
    );

    let err = tokio::time::timeout(
        Duration::from_secs(1),
        ledger.purchase_ticket(&"juan".into(), &"principal".into(), festival_day()),
    )
    .await
    .expect("deadline should end the call while begin is stalled")
    .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::DeadlineExceeded { deadline_ms: 30 }
    ));
    assert_eq!(store.commits.load(Ordering::SeqCst), 0);
    assert_eq!(store.abandoned.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_covers_stalled_begin() {
    let mut memory = MemoryStore::with_records(&["juan"], &[("principal", 3)]);
    memory.stall_on_begin = true;
    let (ledger, store) = ledger_over(memory, LedgerConfig::default());
    let (handle, token) = cancel_channel();

    let req = ReversalRequest::new("juan".into(), "principal".into(), festival_day(), 1);
    let reversal = ledger.reverse_ticket_with_cancel(req, token);
    let trigger = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    };

    let (result, _) = tokio::join!(reversal, trigger);

    assert!(matches!(result, Err(LedgerError::Cancelled)));
    assert_eq!(store.capacity("principal"), 3);
}

#[test]
fn test_deadline_millis_saturates() {
    assert_eq!(deadline_millis(Duration::from_millis(250)), 250);
    assert_eq!(deadline_millis(Duration::MAX), u64::MAX);
}
