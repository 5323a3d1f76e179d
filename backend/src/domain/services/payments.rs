//! Payment lifecycle: initiation, verification, manual records, overrides.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::map_repo_error;
use crate::domain::ports::{
    CreateSessionRequest, EventNotifier, GatewayCustomer, GatewayError, InitiatePaymentRequest,
    InitiatedPayment, ManualPaymentRequest, PaymentFilter, PaymentGateway, PaymentListFilter,
    PaymentRepository, PaymentService, StudentRepository, VerifyPaymentRequest,
};
use crate::domain::{Caller, Error, Payment, PaymentId, PaymentStatus, Student};

const CURRENCY: &str = "NGN";
const CHECKOUT_TITLE: &str = "School Lunch Wallet";

/// Payment service over the payment and student repositories and the
/// external gateway. The merchant reference (`tx_ref`) handed to the gateway
/// is the payment's own identifier, so verification maps straight back to
/// the pending row.
#[derive(Clone)]
pub struct PaymentServiceImpl<P, S, G> {
    payments: Arc<P>,
    students: Arc<S>,
    gateway: Arc<G>,
    notifier: Arc<dyn EventNotifier>,
    /// Absolute URL of the verification endpoint the gateway redirects to.
    verify_redirect_url: String,
}

impl<P, S, G> PaymentServiceImpl<P, S, G> {
    pub fn new(
        payments: Arc<P>,
        students: Arc<S>,
        gateway: Arc<G>,
        notifier: Arc<dyn EventNotifier>,
        verify_redirect_url: String,
    ) -> Self {
        Self {
            payments,
            students,
            gateway,
            notifier,
            verify_redirect_url,
        }
    }
}

fn map_gateway_error(error: GatewayError) -> Error {
    match error {
        GatewayError::Transport { message } | GatewayError::Timeout { message } => {
            Error::service_unavailable(format!("payment gateway unreachable: {message}"))
        }
        GatewayError::Declined { message } => {
            Error::invalid_request(format!("payment gateway declined: {message}"))
        }
        GatewayError::Decode { message } => {
            Error::internal(format!("payment gateway response invalid: {message}"))
        }
        GatewayError::InvalidRequest { message } => Error::invalid_request(message),
    }
}

impl<P, S, G> PaymentServiceImpl<P, S, G>
where
    P: PaymentRepository,
    S: StudentRepository,
    G: PaymentGateway,
{
    /// Fetch a student the caller may fund. Other parents' students answer
    /// `not_found`.
    async fn fetch_visible_student(
        &self,
        caller: &Caller,
        id: crate::domain::StudentId,
    ) -> Result<Student, Error> {
        let student = self
            .students
            .find_by_id(id)
            .await
            .map_err(|err| map_repo_error("student", err))?
            .ok_or_else(|| Error::not_found("student not found"))?;
        if !caller.is_admin() && !student.is_owned_by(caller.id) {
            return Err(Error::not_found("student not found"));
        }
        Ok(student)
    }

    async fn student_name(&self, id: crate::domain::StudentId) -> String {
        match self.students.find_by_id(id).await {
            Ok(Some(student)) => student.name,
            Ok(None) => "your student".to_owned(),
            Err(err) => {
                tracing::warn!(error = %err, "student lookup for notification failed");
                "your student".to_owned()
            }
        }
    }

    async fn fail_verification(
        &self,
        mut payment: Payment,
        reason: &str,
    ) -> Result<Payment, Error> {
        self.payments
            .mark_failed(payment.id, reason)
            .await
            .map_err(|err| map_repo_error("payment", err))?;

        let student_name = self.student_name(payment.student_id).await;
        if let Err(err) = self
            .notifier
            .payment_failed(payment.parent_id, &student_name, payment.amount, reason)
            .await
        {
            tracing::warn!(error = %err, "payment-failed notification failed");
        }

        tracing::info!(payment_id = %payment.id, reason, "payment verification failed");
        payment.status = PaymentStatus::Failed;
        payment.failure_reason = Some(reason.to_owned());
        payment.updated_at = Utc::now();
        Ok(payment)
    }
}

#[async_trait]
impl<P, S, G> PaymentService for PaymentServiceImpl<P, S, G>
where
    P: PaymentRepository,
    S: StudentRepository,
    G: PaymentGateway,
{
    async fn initiate(
        &self,
        caller: &Caller,
        request: InitiatePaymentRequest,
    ) -> Result<InitiatedPayment, Error> {
        if !request.amount.is_positive() {
            return Err(Error::invalid_request("amount must be positive"));
        }
        let student = self.fetch_visible_student(caller, request.student_id).await?;

        let payment = Payment::new_pending(
            caller.id,
            student.id,
            request.amount,
            request.payment_type,
            request.category.unwrap_or_else(|| "funding".to_owned()),
            request.description,
        );
        self.payments
            .insert(&payment)
            .await
            .map_err(|err| map_repo_error("payment", err))?;

        let session_request = CreateSessionRequest {
            tx_ref: payment.id.to_string(),
            amount: payment.amount,
            currency: CURRENCY.to_owned(),
            redirect_url: self.verify_redirect_url.clone(),
            customer: GatewayCustomer {
                email: caller.email.clone(),
                name: caller.name.clone(),
                phone: caller.phone.clone(),
            },
            title: CHECKOUT_TITLE.to_owned(),
            description: format!("Lunch wallet funding for {}", student.name),
            meta: json!({
                "paymentId": payment.id,
                "studentId": student.id,
                "studentName": student.name,
                "paymentType": payment.payment_type,
            }),
        };

        let session = match self.gateway.create_session(&session_request).await {
            Ok(session) => session,
            Err(err) => {
                let reason = err.to_string();
                if let Err(mark_err) = self.payments.mark_failed(payment.id, &reason).await {
                    tracing::warn!(error = %mark_err, "marking failed payment failed");
                }
                return Err(map_gateway_error(err));
            }
        };

        self.payments
            .record_gateway_session(payment.id, session.gateway_ref.as_deref(), &session.payment_link)
            .await
            .map_err(|err| map_repo_error("payment", err))?;

        tracing::info!(payment_id = %payment.id, amount = payment.amount.minor(), "payment initiated");
        let mut payment = payment;
        payment.gateway_ref = session.gateway_ref.clone();
        payment.payment_link = Some(session.payment_link.clone());
        Ok(InitiatedPayment {
            payment,
            payment_link: session.payment_link,
        })
    }

    async fn verify(&self, request: VerifyPaymentRequest) -> Result<Payment, Error> {
        let payment_id: PaymentId = request
            .tx_ref
            .parse()
            .map_err(|_| Error::invalid_request("unknown payment reference"))?;
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await
            .map_err(|err| map_repo_error("payment", err))?
            .ok_or_else(|| Error::not_found("payment not found"))?;

        // Re-verifying a completed payment must never credit again.
        if payment.status == PaymentStatus::Completed {
            return Ok(payment);
        }

        let verified = self
            .gateway
            .verify_transaction(&request.transaction_id)
            .await
            .map_err(map_gateway_error)?;

        if verified.tx_ref != request.tx_ref {
            return self.fail_verification(payment, "transaction reference mismatch").await;
        }
        if !verified.successful {
            return self
                .fail_verification(payment, "gateway reported the transaction unsuccessful")
                .await;
        }
        if verified.amount != payment.amount {
            return self.fail_verification(payment, "amount mismatch").await;
        }
        if verified.currency != CURRENCY {
            return self.fail_verification(payment, "currency mismatch").await;
        }

        self.payments
            .complete_with_credit(
                payment.id,
                payment.student_id,
                payment.amount,
                &verified.transaction_id,
                &verified.raw,
            )
            .await
            .map_err(|err| map_repo_error("payment", err))?;

        let student_name = self.student_name(payment.student_id).await;
        if let Err(err) = self
            .notifier
            .payment_succeeded(payment.parent_id, &student_name, payment.amount)
            .await
        {
            tracing::warn!(error = %err, "payment-succeeded notification failed");
        }

        tracing::info!(payment_id = %payment.id, amount = payment.amount.minor(), "payment completed");
        let mut payment = payment;
        payment.status = PaymentStatus::Completed;
        payment.transaction_id = Some(verified.transaction_id);
        payment.gateway_payload = Some(verified.raw);
        payment.updated_at = Utc::now();
        Ok(payment)
    }

    async fn list(
        &self,
        caller: &Caller,
        filter: PaymentListFilter,
    ) -> Result<Vec<Payment>, Error> {
        let repo_filter = PaymentFilter {
            parent_id: (!caller.is_admin()).then_some(caller.id),
            student_id: filter.student_id,
            status: filter.status,
            payment_type: filter.payment_type,
        };
        self.payments
            .list(&repo_filter)
            .await
            .map_err(|err| map_repo_error("payment", err))
    }

    async fn record_manual(
        &self,
        caller: &Caller,
        request: ManualPaymentRequest,
    ) -> Result<Payment, Error> {
        if !request.amount.is_positive() {
            return Err(Error::invalid_request("amount must be positive"));
        }
        let student = self.fetch_visible_student(caller, request.student_id).await?;
        let parent_id = student
            .parent_id
            .ok_or_else(|| Error::invalid_request("student is not attached to a parent account"))?;

        let mut payment = Payment::new_pending(
            parent_id,
            student.id,
            request.amount,
            request.payment_type,
            request.category.unwrap_or_else(|| "manual".to_owned()),
            request.description,
        );
        payment.status = PaymentStatus::Completed;
        payment.transaction_id = Some("manual".to_owned());

        self.payments
            .insert_completed_with_credit(&payment)
            .await
            .map_err(|err| map_repo_error("payment", err))?;

        if let Err(err) = self
            .notifier
            .balance_updated(parent_id, &student.name, payment.amount)
            .await
        {
            tracing::warn!(error = %err, "balance-updated notification failed");
        }

        tracing::info!(payment_id = %payment.id, "manual payment recorded");
        Ok(payment)
    }

    async fn override_status(
        &self,
        caller: &Caller,
        id: PaymentId,
        status: PaymentStatus,
    ) -> Result<Payment, Error> {
        let mut payment = self
            .payments
            .find_by_id(id)
            .await
            .map_err(|err| map_repo_error("payment", err))?
            .ok_or_else(|| Error::not_found("payment not found"))?;
        if !caller.is_admin() && payment.parent_id != caller.id {
            return Err(Error::not_found("payment not found"));
        }

        if payment.status == status {
            return Ok(payment);
        }

        match (payment.status, status) {
            (PaymentStatus::Pending, PaymentStatus::Completed) => {
                // Forcing completion credits through the same transactional
                // path as verification.
                self.payments
                    .complete_with_credit(
                        payment.id,
                        payment.student_id,
                        payment.amount,
                        "manual-override",
                        &json!({ "override": true }),
                    )
                    .await
                    .map_err(|err| map_repo_error("payment", err))?;
                payment.transaction_id = Some("manual-override".to_owned());
            }
            (from, PaymentStatus::Failed) => {
                // Leaving completed reverses the earlier credit exactly once.
                let reversal = (from == PaymentStatus::Completed)
                    .then_some((payment.student_id, payment.amount));
                self.payments
                    .set_status(payment.id, status, reversal)
                    .await
                    .map_err(|err| map_repo_error("payment", err))?;
            }
            (from, to) => {
                return Err(Error::conflict(format!(
                    "payment status cannot change from {} to {}",
                    from.as_str(),
                    to.as_str()
                )));
            }
        }

        let student_name = self.student_name(payment.student_id).await;
        if let Err(err) = self
            .notifier
            .balance_updated(payment.parent_id, &student_name, payment.amount)
            .await
        {
            tracing::warn!(error = %err, "balance-updated notification failed");
        }

        tracing::info!(payment_id = %payment.id, from = %payment.status, to = %status, "payment status overridden");
        payment.status = status;
        payment.updated_at = Utc::now();
        Ok(payment)
    }
}
