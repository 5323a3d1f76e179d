//! Student roster management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::map_repo_error;
use crate::domain::ports::{
    EventNotifier, NewStudentRequest, StudentPatch, StudentRepository, StudentService,
};
use crate::domain::{Amount, Caller, Error, Student, StudentId, StudentStatus};

/// Student service over the student repository. Parents operate on their own
/// students; admins see the whole roster.
#[derive(Clone)]
pub struct StudentServiceImpl<S> {
    students: Arc<S>,
    notifier: Arc<dyn EventNotifier>,
}

impl<S> StudentServiceImpl<S> {
    pub fn new(students: Arc<S>, notifier: Arc<dyn EventNotifier>) -> Self {
        Self { students, notifier }
    }
}

impl<S> StudentServiceImpl<S>
where
    S: StudentRepository,
{
    /// Fetch a student the caller may act on. Records owned by other parents
    /// answer `not_found` so their existence is not revealed.
    async fn fetch_visible(&self, caller: &Caller, id: StudentId) -> Result<Student, Error> {
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
}

fn validate_new_student(request: &NewStudentRequest) -> Result<(), Error> {
    if request.name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty"));
    }
    if request.grade.trim().is_empty() {
        return Err(Error::invalid_request("grade must not be empty"));
    }
    if request.admission_number.trim().is_empty() {
        return Err(Error::invalid_request("admission number must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl<S> StudentService for StudentServiceImpl<S>
where
    S: StudentRepository,
{
    async fn list(&self, caller: &Caller) -> Result<Vec<Student>, Error> {
        let students = if caller.is_admin() {
            self.students.list_all().await
        } else {
            self.students.list_by_parent(caller.id).await
        };
        students.map_err(|err| map_repo_error("student", err))
    }

    async fn create(
        &self,
        caller: &Caller,
        request: NewStudentRequest,
    ) -> Result<Student, Error> {
        validate_new_student(&request)?;

        let now = Utc::now();
        let student = Student {
            id: StudentId::random(),
            parent_id: (!caller.is_admin()).then_some(caller.id),
            name: request.name.trim().to_owned(),
            grade: request.grade.trim().to_owned(),
            admission_number: request.admission_number.trim().to_owned(),
            dietary_preferences: request.dietary_preferences,
            allergies: request.allergies,
            other_allergies: request.other_allergies,
            additional_notes: request.additional_notes,
            balance: Amount::ZERO,
            status: StudentStatus::Active,
            last_payment_at: None,
            created_at: now,
            updated_at: now,
        };

        self.students
            .insert(&student)
            .await
            .map_err(|err| map_repo_error("student", err))?;

        if let Some(parent_id) = student.parent_id {
            if let Err(err) = self.notifier.student_added(parent_id, &student.name).await {
                tracing::warn!(error = %err, "student-added notification failed");
            }
        }

        Ok(student)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: StudentId,
        patch: StudentPatch,
    ) -> Result<Student, Error> {
        let mut student = self.fetch_visible(caller, id).await?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_request("name must not be empty"));
            }
            student.name = name.trim().to_owned();
        }
        if let Some(grade) = patch.grade {
            student.grade = grade.trim().to_owned();
        }
        if let Some(admission_number) = patch.admission_number {
            student.admission_number = admission_number.trim().to_owned();
        }
        if let Some(dietary) = patch.dietary_preferences {
            student.dietary_preferences = dietary;
        }
        if let Some(allergies) = patch.allergies {
            student.allergies = allergies;
        }
        if let Some(other) = patch.other_allergies {
            student.other_allergies = Some(other);
        }
        if let Some(notes) = patch.additional_notes {
            student.additional_notes = Some(notes);
        }
        if let Some(status) = patch.status {
            student.status = status;
        }
        student.updated_at = Utc::now();

        self.students
            .update(&student)
            .await
            .map_err(|err| map_repo_error("student", err))?;
        Ok(student)
    }

    async fn remove(&self, caller: &Caller, id: StudentId) -> Result<(), Error> {
        self.fetch_visible(caller, id).await?;
        let deleted = self
            .students
            .delete(id)
            .await
            .map_err(|err| map_repo_error("student", err))?;
        if !deleted {
            return Err(Error::not_found("student not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockEventNotifier, MockStudentRepository};
    use crate::domain::{ErrorCode, Role, UserId};
    use rstest::rstest;

    fn parent_caller(id: UserId) -> Caller {
        Caller {
            id,
            name: "Ngozi Okafor".to_owned(),
            email: "ngozi@example.com".to_owned(),
            phone: None,
            role: Role::Parent,
        }
    }

    fn admin_caller() -> Caller {
        Caller {
            id: UserId::random(),
            name: "Canteen Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            phone: None,
            role: Role::Admin,
        }
    }

    fn new_student_request() -> NewStudentRequest {
        NewStudentRequest {
            name: "Ada".to_owned(),
            grade: "JSS1".to_owned(),
            admission_number: "ADM-001".to_owned(),
            dietary_preferences: vec!["vegetarian".to_owned()],
            allergies: Vec::new(),
            other_allergies: None,
            additional_notes: None,
        }
    }

    fn owned_student(parent_id: UserId) -> Student {
        Student {
            id: StudentId::random(),
            parent_id: Some(parent_id),
            name: "Ada".to_owned(),
            grade: "JSS1".to_owned(),
            admission_number: "ADM-001".to_owned(),
            dietary_preferences: Vec::new(),
            allergies: Vec::new(),
            other_allergies: None,
            additional_notes: None,
            balance: Amount::ZERO,
            status: StudentStatus::Active,
            last_payment_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_attaches_the_calling_parent_and_notifies() {
        let parent_id = UserId::random();
        let mut students = MockStudentRepository::new();
        students
            .expect_insert()
            .withf(move |student: &Student| {
                student.parent_id == Some(parent_id) && student.balance == Amount::ZERO
            })
            .times(1)
            .return_once(|_| Ok(()));
        let mut notifier = MockEventNotifier::new();
        notifier
            .expect_student_added()
            .withf(move |id, name| *id == parent_id && name == "Ada")
            .times(1)
            .return_once(|_, _| Ok(()));

        let service = StudentServiceImpl::new(Arc::new(students), Arc::new(notifier));
        let student = service
            .create(&parent_caller(parent_id), new_student_request())
            .await
            .expect("student created");
        assert_eq!(student.status, StudentStatus::Active);
    }

    #[tokio::test]
    async fn create_survives_a_failed_notification() {
        let parent_id = UserId::random();
        let mut students = MockStudentRepository::new();
        students.expect_insert().times(1).return_once(|_| Ok(()));
        let mut notifier = MockEventNotifier::new();
        notifier
            .expect_student_added()
            .times(1)
            .return_once(|_, _| Err(Error::internal("inbox down")));

        let service = StudentServiceImpl::new(Arc::new(students), Arc::new(notifier));
        assert!(service
            .create(&parent_caller(parent_id), new_student_request())
            .await
            .is_ok());
    }

    #[rstest]
    #[case("", "JSS1", "ADM-001")]
    #[case("Ada", " ", "ADM-001")]
    #[case("Ada", "JSS1", "")]
    #[tokio::test]
    async fn create_rejects_blank_required_fields(
        #[case] name: &str,
        #[case] grade: &str,
        #[case] admission_number: &str,
    ) {
        let service = StudentServiceImpl::new(
            Arc::new(MockStudentRepository::new()),
            Arc::new(MockEventNotifier::new()),
        );
        let request = NewStudentRequest {
            name: name.to_owned(),
            grade: grade.to_owned(),
            admission_number: admission_number.to_owned(),
            dietary_preferences: Vec::new(),
            allergies: Vec::new(),
            other_allergies: None,
            additional_notes: None,
        };
        let error = service
            .create(&parent_caller(UserId::random()), request)
            .await
            .expect_err("invalid request");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn another_parents_student_reads_as_not_found() {
        let student = owned_student(UserId::random());
        let student_id = student.id;
        let mut students = MockStudentRepository::new();
        students
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(student)));

        let service = StudentServiceImpl::new(
            Arc::new(students),
            Arc::new(MockEventNotifier::new()),
        );
        let error = service
            .update(
                &parent_caller(UserId::random()),
                student_id,
                StudentPatch::default(),
            )
            .await
            .expect_err("hidden from other parents");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn admins_may_update_any_student() {
        let student = owned_student(UserId::random());
        let student_id = student.id;
        let mut students = MockStudentRepository::new();
        students
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(student)));
        students
            .expect_update()
            .withf(|student: &Student| student.status == StudentStatus::Inactive)
            .times(1)
            .return_once(|_| Ok(()));

        let service = StudentServiceImpl::new(
            Arc::new(students),
            Arc::new(MockEventNotifier::new()),
        );
        let patch = StudentPatch {
            status: Some(StudentStatus::Inactive),
            ..StudentPatch::default()
        };
        let updated = service
            .update(&admin_caller(), student_id, patch)
            .await
            .expect("admin update succeeds");
        assert_eq!(updated.status, StudentStatus::Inactive);
    }

    #[tokio::test]
    async fn remove_deletes_an_owned_student() {
        let parent_id = UserId::random();
        let student = owned_student(parent_id);
        let student_id = student.id;
        let mut students = MockStudentRepository::new();
        students
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(student)));
        students
            .expect_delete()
            .times(1)
            .return_once(|_| Ok(true));

        let service = StudentServiceImpl::new(
            Arc::new(students),
            Arc::new(MockEventNotifier::new()),
        );
        service
            .remove(&parent_caller(parent_id), student_id)
            .await
            .expect("removal succeeds");
    }

    #[tokio::test]
    async fn listing_scopes_parents_to_their_own_students() {
        let parent_id = UserId::random();
        let mut students = MockStudentRepository::new();
        students
            .expect_list_by_parent()
            .withf(move |id| *id == parent_id)
            .times(1)
            .return_once(move |_| Ok(vec![owned_student(parent_id)]));

        let service = StudentServiceImpl::new(
            Arc::new(students),
            Arc::new(MockEventNotifier::new()),
        );
        let listed = service
            .list(&parent_caller(parent_id))
            .await
            .expect("listing succeeds");
        assert_eq!(listed.len(), 1);
    }
}
