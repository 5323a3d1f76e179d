//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    AccountService, LunchService, NotificationService, PaymentService, StudentService,
    SupportService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub students: Arc<dyn StudentService>,
    pub payments: Arc<dyn PaymentService>,
    pub lunch: Arc<dyn LunchService>,
    pub support: Arc<dyn SupportService>,
    pub notifications: Arc<dyn NotificationService>,
    /// Externally visible base URL, used to build post-checkout redirects.
    pub public_base_url: Url,
    /// Directory where ticket attachments are stored.
    pub upload_dir: PathBuf,
}
