//! Shared in-memory fixtures for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the stateful fixture adapters live here once instead of per binary. Each
//! fixture implements a driven port over a `Mutex`-guarded `Vec`, close
//! enough to the real adapters that the services cannot tell the difference,
//! while keeping every balance mutation observable from the test body.

// Not every test binary exercises every fixture.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use backend::domain::ports::{
    CreateSessionRequest, GatewayError, GatewaySession, LunchOrderQuery, LunchOrderRepository,
    LunchPreferencesRepository, MenuRepository, NotificationListQuery, NotificationRepository,
    PaymentFilter, PaymentGateway, PaymentRepository, StudentRepository, SupportTicketRepository,
    UserRepository, VerifiedTransaction,
};
use backend::domain::services::{
    LunchServiceImpl, NotificationServiceImpl, PaymentServiceImpl, SupportServiceImpl,
};
use backend::domain::ports::RepositoryError;
use backend::domain::{
    Amount, Caller, LunchOrder, LunchPreferences, MenuItem, MenuItemId, Notification,
    NotificationId, Payment, PaymentId, PaymentStatus, Role, Student, StudentId, StudentStatus,
    SupportTicket, TicketId, TicketReply, TicketStatus, TicketWithReplies, User, UserId,
};

fn poisoned(what: &str) -> RepositoryError {
    RepositoryError::connection(format!("{what} store poisoned"))
}

// ---------------------------------------------------------------------------
// Accounts

pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            rows: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("user"))?;
        if rows.iter().any(|row| row.email == user.email) {
            return Err(RepositoryError::duplicate_key("email"));
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("user"))?;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("user"))?;
        Ok(rows.iter().find(|row| row.email == email).cloned())
    }

    async fn list_admins(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("user"))?;
        Ok(rows
            .iter()
            .filter(|row| row.role == Role::Admin)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Students

pub struct MemoryStudents {
    rows: Mutex<Vec<Student>>,
}

impl MemoryStudents {
    pub fn with(students: Vec<Student>) -> Self {
        Self {
            rows: Mutex::new(students),
        }
    }

    /// Current balance, for assertions.
    pub fn balance_of(&self, id: StudentId) -> Amount {
        let rows = self.rows.lock().expect("student store poisoned");
        rows.iter()
            .find(|row| row.id == id)
            .map(|row| row.balance)
            .expect("student exists")
    }

    fn credit(&self, id: StudentId, amount: Amount) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RepositoryError::query("student row missing"))?;
        row.balance = row
            .balance
            .checked_add(amount)
            .ok_or_else(|| RepositoryError::query("balance overflow"))?;
        row.last_payment_at = Some(Utc::now());
        row.updated_at = Utc::now();
        Ok(())
    }

    fn debit(&self, id: StudentId, amount: Amount) -> Result<Amount, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RepositoryError::query("student row missing"))?;
        row.balance = row
            .balance
            .checked_sub(amount)
            .ok_or_else(|| RepositoryError::query("balance overflow"))?;
        row.updated_at = Utc::now();
        Ok(row.balance)
    }
}

#[async_trait]
impl StudentRepository for MemoryStudents {
    async fn insert(&self, student: &Student) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        if rows
            .iter()
            .any(|row| row.admission_number == student.admission_number)
        {
            return Err(RepositoryError::duplicate_key("admission_number"));
        }
        rows.push(student.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Student>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        Ok(rows.iter().rev().cloned().collect())
    }

    async fn list_by_parent(&self, parent_id: UserId) -> Result<Vec<Student>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn update(&self, student: &Student) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == student.id)
            .ok_or_else(|| RepositoryError::query("student row missing"))?;
        *row = student.clone();
        Ok(())
    }

    async fn delete(&self, id: StudentId) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("student"))?;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Payments

pub struct MemoryPayments {
    rows: Mutex<Vec<Payment>>,
    students: Arc<MemoryStudents>,
}

impl MemoryPayments {
    pub fn over(students: Arc<MemoryStudents>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            students,
        }
    }

    /// Stored payment row, for assertions.
    pub fn row(&self, id: PaymentId) -> Payment {
        let rows = self.rows.lock().expect("payment store poisoned");
        rows.iter()
            .find(|row| row.id == id)
            .cloned()
            .expect("payment exists")
    }
}

#[async_trait]
impl PaymentRepository for MemoryPayments {
    async fn insert(&self, payment: &Payment) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
        rows.push(payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| filter.parent_id.is_none_or(|id| row.parent_id == id))
            .filter(|row| filter.student_id.is_none_or(|id| row.student_id == id))
            .filter(|row| filter.status.is_none_or(|status| row.status == status))
            .filter(|row| {
                filter
                    .payment_type
                    .as_deref()
                    .is_none_or(|kind| row.payment_type == kind)
            })
            .cloned()
            .collect())
    }

    async fn record_gateway_session<'a>(
        &self,
        id: PaymentId,
        gateway_ref: Option<&'a str>,
        payment_link: &str,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RepositoryError::query("payment row missing"))?;
        row.gateway_ref = gateway_ref.map(str::to_owned);
        row.payment_link = Some(payment_link.to_owned());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_failed(&self, id: PaymentId, reason: &str) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| RepositoryError::query("payment row missing"))?;
        row.status = PaymentStatus::Failed;
        row.failure_reason = Some(reason.to_owned());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn complete_with_credit(
        &self,
        id: PaymentId,
        student_id: StudentId,
        amount: Amount,
        transaction_id: &str,
        payload: &Value,
    ) -> Result<(), RepositoryError> {
        {
            let mut rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
            let row = rows
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| RepositoryError::query("payment row missing"))?;
            row.status = PaymentStatus::Completed;
            row.transaction_id = Some(transaction_id.to_owned());
            row.gateway_payload = Some(payload.clone());
            row.updated_at = Utc::now();
        }
        self.students.credit(student_id, amount)
    }

    async fn insert_completed_with_credit(
        &self,
        payment: &Payment,
    ) -> Result<(), RepositoryError> {
        {
            let mut rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
            rows.push(payment.clone());
        }
        self.students.credit(payment.student_id, payment.amount)
    }

    async fn set_status(
        &self,
        id: PaymentId,
        status: PaymentStatus,
        reversal: Option<(StudentId, Amount)>,
    ) -> Result<(), RepositoryError> {
        {
            let mut rows = self.rows.lock().map_err(|_| poisoned("payment"))?;
            let row = rows
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| RepositoryError::query("payment row missing"))?;
            row.status = status;
            row.updated_at = Utc::now();
        }
        if let Some((student_id, amount)) = reversal {
            self.students.debit(student_id, amount)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lunch

pub struct MemoryOrders {
    rows: Mutex<Vec<LunchOrder>>,
    students: Arc<MemoryStudents>,
}

impl MemoryOrders {
    pub fn over(students: Arc<MemoryStudents>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            students,
        }
    }

    pub fn count(&self) -> usize {
        self.rows.lock().expect("order store poisoned").len()
    }
}

#[async_trait]
impl LunchOrderRepository for MemoryOrders {
    async fn insert(&self, order: &LunchOrder) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("lunch order"))?;
        rows.push(order.clone());
        Ok(())
    }

    async fn list(&self, query: &LunchOrderQuery) -> Result<Vec<LunchOrder>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("lunch order"))?;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| query.student_id.is_none_or(|id| row.student_id == id))
            .filter(|row| {
                query
                    .date
                    .is_none_or(|date| row.date.date_naive() == date.date_naive())
            })
            .cloned()
            .collect())
    }

    async fn insert_with_debit(&self, order: &LunchOrder) -> Result<Amount, RepositoryError> {
        {
            let mut rows = self.rows.lock().map_err(|_| poisoned("lunch order"))?;
            rows.push(order.clone());
        }
        self.students.debit(order.student_id, order.amount)
    }
}

pub struct MemoryMenu {
    rows: Mutex<Vec<MenuItem>>,
}

impl MemoryMenu {
    pub fn with(items: Vec<MenuItem>) -> Self {
        Self {
            rows: Mutex::new(items),
        }
    }
}

#[async_trait]
impl MenuRepository for MemoryMenu {
    async fn insert(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("menu"))?;
        rows.push(item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("menu"))?;
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("menu"))?;
        let mut items: Vec<MenuItem> = rows.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

pub struct MemoryPreferences {
    rows: Mutex<Vec<(StudentId, LunchPreferences)>>,
}

impl MemoryPreferences {
    pub fn empty() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LunchPreferencesRepository for MemoryPreferences {
    async fn find_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Option<LunchPreferences>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("preferences"))?;
        Ok(rows
            .iter()
            .find(|(id, _)| *id == student_id)
            .map(|(_, preferences)| preferences.clone()))
    }

    async fn upsert(
        &self,
        student_id: StudentId,
        preferences: &LunchPreferences,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("preferences"))?;
        if let Some(entry) = rows.iter_mut().find(|(id, _)| *id == student_id) {
            entry.1 = preferences.clone();
        } else {
            rows.push((student_id, preferences.clone()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notifications

pub struct MemoryNotifications {
    rows: Mutex<Vec<Notification>>,
}

impl MemoryNotifications {
    pub fn empty() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotifications {
    async fn insert(&self, notification: &Notification) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        rows.push(notification.clone());
        Ok(())
    }

    async fn insert_many(&self, notifications: &[Notification]) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        rows.extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: UserId,
        query: &NotificationListQuery,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.recipient_id == recipient_id)
            .filter(|row| !query.unread_only || !row.read)
            .skip(usize::try_from(query.skip).unwrap_or(0))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn unread_count(&self, recipient_id: UserId) -> Result<i64, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        let count = rows
            .iter()
            .filter(|row| row.recipient_id == recipient_id && !row.read)
            .count();
        i64::try_from(count).map_err(|_| RepositoryError::query("unread count overflow"))
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        match rows
            .iter_mut()
            .find(|row| row.id == id && row.recipient_id == recipient_id)
        {
            Some(row) => {
                row.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> Result<u64, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        let mut updated = 0;
        for row in rows
            .iter_mut()
            .filter(|row| row.recipient_id == recipient_id && !row.read)
        {
            row.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("notification"))?;
        let before = rows.len();
        rows.retain(|row| !(row.id == id && row.recipient_id == recipient_id));
        Ok(rows.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Support tickets

pub struct MemoryTickets {
    rows: Mutex<Vec<TicketWithReplies>>,
}

impl MemoryTickets {
    pub fn empty() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SupportTicketRepository for MemoryTickets {
    async fn insert(&self, ticket: &SupportTicket) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        rows.push(TicketWithReplies {
            ticket: ticket.clone(),
            replies: Vec::new(),
        });
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: TicketId,
    ) -> Result<Option<TicketWithReplies>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        Ok(rows.iter().find(|row| row.ticket.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<TicketWithReplies>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        Ok(rows.iter().rev().cloned().collect())
    }

    async fn list_by_parent(
        &self,
        parent_id: UserId,
    ) -> Result<Vec<TicketWithReplies>, RepositoryError> {
        let rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| row.ticket.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn append_reply(
        &self,
        reply: &TicketReply,
        status: TicketStatus,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.ticket.id == reply.ticket_id)
            .ok_or_else(|| RepositoryError::query("ticket row missing"))?;
        row.replies.push(reply.clone());
        row.ticket.status = status;
        row.ticket.updated_at = Utc::now();
        Ok(())
    }

    async fn record_admin_response(
        &self,
        id: TicketId,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        let row = rows
            .iter_mut()
            .find(|row| row.ticket.id == id)
            .ok_or_else(|| RepositoryError::query("ticket row missing"))?;
        row.ticket.admin_response = Some(response.to_owned());
        row.ticket.admin_response_at = Some(at);
        Ok(())
    }

    async fn set_status(
        &self,
        id: TicketId,
        status: TicketStatus,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().map_err(|_| poisoned("ticket"))?;
        match rows.iter_mut().find(|row| row.ticket.id == id) {
            Some(row) => {
                row.ticket.status = status;
                row.ticket.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway

/// Scripted gateway fixture. Tests queue the responses each call should
/// receive; an unscripted call answers a transport error so a test that
/// over-calls fails loudly.
pub struct ScriptedGateway {
    sessions: Mutex<VecDeque<Result<GatewaySession, GatewayError>>>,
    verifications: Mutex<VecDeque<Result<VerifiedTransaction, GatewayError>>>,
    verify_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(VecDeque::new()),
            verifications: Mutex::new(VecDeque::new()),
            verify_calls: AtomicUsize::new(0),
        }
    }

    pub fn queue_session(&self, response: Result<GatewaySession, GatewayError>) {
        self.sessions
            .lock()
            .expect("gateway script poisoned")
            .push_back(response);
    }

    pub fn queue_verification(&self, response: Result<VerifiedTransaction, GatewayError>) {
        self.verifications
            .lock()
            .expect("gateway script poisoned")
            .push_back(response);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_session(
        &self,
        _request: &CreateSessionRequest,
    ) -> Result<GatewaySession, GatewayError> {
        self.sessions
            .lock()
            .map_err(|_| GatewayError::transport("gateway script poisoned"))?
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::transport("no scripted session response")))
    }

    async fn verify_transaction(
        &self,
        _transaction_id: &str,
    ) -> Result<VerifiedTransaction, GatewayError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verifications
            .lock()
            .map_err(|_| GatewayError::transport("gateway script poisoned"))?
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::transport("no scripted verification response")))
    }
}

// ---------------------------------------------------------------------------
// Builders and the assembled world

pub fn parent_user(name: &str, email: &str) -> User {
    User {
        id: UserId::random(),
        name: name.to_owned(),
        email: email.to_owned(),
        phone: Some("+2348012345678".to_owned()),
        role: Role::Parent,
        password_hash: "$2b$12$fixture-hash".to_owned(),
        created_at: Utc::now(),
    }
}

pub fn admin_user(name: &str, email: &str) -> User {
    User {
        role: Role::Admin,
        ..parent_user(name, email)
    }
}

pub fn student_of(parent_id: UserId, name: &str, balance: Amount) -> Student {
    let now = Utc::now();
    Student {
        id: StudentId::random(),
        parent_id: Some(parent_id),
        name: name.to_owned(),
        grade: "JSS1".to_owned(),
        admission_number: format!("ADM-{}", Uuid::new_v4().simple()),
        dietary_preferences: Vec::new(),
        allergies: Vec::new(),
        other_allergies: None,
        additional_notes: None,
        balance,
        status: StudentStatus::Active,
        last_payment_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn menu_item(name: &str, price: Amount) -> MenuItem {
    MenuItem {
        id: MenuItemId::random(),
        name: name.to_owned(),
        description: None,
        price,
        category: "main".to_owned(),
        allergens: Vec::new(),
        available: true,
        created_at: Utc::now(),
    }
}

/// One assembled world per test: shared stores, the scripted gateway, and
/// the real notification inbox doubling as the event notifier.
pub struct World {
    pub users: Arc<MemoryUsers>,
    pub students: Arc<MemoryStudents>,
    pub payments: Arc<MemoryPayments>,
    pub orders: Arc<MemoryOrders>,
    pub menu: Arc<MemoryMenu>,
    pub preferences: Arc<MemoryPreferences>,
    pub notifications: Arc<MemoryNotifications>,
    pub tickets: Arc<MemoryTickets>,
    pub gateway: Arc<ScriptedGateway>,
    pub inbox: Arc<NotificationServiceImpl<MemoryNotifications, MemoryUsers>>,
}

impl World {
    pub fn seeded(users: Vec<User>, students: Vec<Student>, items: Vec<MenuItem>) -> Self {
        let users = Arc::new(MemoryUsers::with(users));
        let students = Arc::new(MemoryStudents::with(students));
        let payments = Arc::new(MemoryPayments::over(students.clone()));
        let orders = Arc::new(MemoryOrders::over(students.clone()));
        let menu = Arc::new(MemoryMenu::with(items));
        let preferences = Arc::new(MemoryPreferences::empty());
        let notifications = Arc::new(MemoryNotifications::empty());
        let tickets = Arc::new(MemoryTickets::empty());
        let gateway = Arc::new(ScriptedGateway::new());
        let inbox = Arc::new(NotificationServiceImpl::new(
            notifications.clone(),
            users.clone(),
        ));
        Self {
            users,
            students,
            payments,
            orders,
            menu,
            preferences,
            notifications,
            tickets,
            gateway,
            inbox,
        }
    }

    pub fn payment_service(
        &self,
    ) -> PaymentServiceImpl<MemoryPayments, MemoryStudents, ScriptedGateway> {
        PaymentServiceImpl::new(
            self.payments.clone(),
            self.students.clone(),
            self.gateway.clone(),
            self.inbox.clone(),
            "https://lunch.example/api/v1/payments/verify".to_owned(),
        )
    }

    pub fn lunch_service(
        &self,
        daily_rate: Amount,
    ) -> LunchServiceImpl<MemoryStudents, MemoryMenu, MemoryOrders, MemoryPreferences> {
        LunchServiceImpl::new(
            self.students.clone(),
            self.menu.clone(),
            self.orders.clone(),
            self.preferences.clone(),
            self.inbox.clone(),
            daily_rate,
        )
    }

    pub fn support_service(&self) -> SupportServiceImpl<MemoryTickets> {
        SupportServiceImpl::new(self.tickets.clone(), self.inbox.clone())
    }
}

/// Inbox snapshot for a recipient, newest first.
pub async fn inbox_of(world: &World, caller: &Caller) -> Vec<Notification> {
    use backend::domain::ports::{NotificationQuery, NotificationService};
    world
        .inbox
        .list(caller, NotificationQuery::default())
        .await
        .expect("inbox listing succeeds")
        .items
}
