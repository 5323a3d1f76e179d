//! Lunch service: eligibility, serving, menus, orders and preferences.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::map_repo_error;
use crate::domain::ports::{
    EligibilityRow, EventNotifier, LunchOrderFilter, LunchOrderQuery, LunchOrderRepository,
    LunchPreferencesRepository, LunchService, MenuRepository, NewMenuItemRequest,
    PlaceOrderRequest, PreferencesUpdate, ServeLunchRequest, StudentRepository,
};
use crate::domain::{
    eligibility, Caller, Error, LunchOrder, LunchOrderStatus, LunchPreferences, MenuItem,
    MenuItemId, Student, StudentId, StudentStatus,
};

/// Lunch service over the student, menu, order and preferences repositories.
/// Serving is deliberately unguarded by balance: the meal is handed over and
/// the balance may go negative.
#[derive(Clone)]
pub struct LunchServiceImpl<S, M, O, R> {
    students: Arc<S>,
    menu: Arc<M>,
    orders: Arc<O>,
    preferences: Arc<R>,
    notifier: Arc<dyn EventNotifier>,
    daily_rate: crate::domain::Amount,
}

impl<S, M, O, R> LunchServiceImpl<S, M, O, R> {
    pub fn new(
        students: Arc<S>,
        menu: Arc<M>,
        orders: Arc<O>,
        preferences: Arc<R>,
        notifier: Arc<dyn EventNotifier>,
        daily_rate: crate::domain::Amount,
    ) -> Self {
        Self {
            students,
            menu,
            orders,
            preferences,
            notifier,
            daily_rate,
        }
    }
}

impl<S, M, O, R> LunchServiceImpl<S, M, O, R>
where
    S: StudentRepository,
    M: MenuRepository,
    O: LunchOrderRepository,
    R: LunchPreferencesRepository,
{
    async fn fetch_visible_student(
        &self,
        caller: &Caller,
        id: StudentId,
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
}

#[async_trait]
impl<S, M, O, R> LunchService for LunchServiceImpl<S, M, O, R>
where
    S: StudentRepository,
    M: MenuRepository,
    O: LunchOrderRepository,
    R: LunchPreferencesRepository,
{
    async fn eligibility_report(&self, caller: &Caller) -> Result<Vec<EligibilityRow>, Error> {
        if !caller.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        let students = self
            .students
            .list_all()
            .await
            .map_err(|err| map_repo_error("student", err))?;
        Ok(students
            .into_iter()
            .filter(|student| student.status == StudentStatus::Active)
            .map(|student| EligibilityRow {
                student_id: student.id,
                name: student.name,
                grade: student.grade,
                balance: student.balance,
                daily_rate: self.daily_rate,
                status: eligibility(student.balance, self.daily_rate),
            })
            .collect())
    }

    async fn serve(
        &self,
        caller: &Caller,
        request: ServeLunchRequest,
    ) -> Result<LunchOrder, Error> {
        if !caller.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        let student = self
            .students
            .find_by_id(request.student_id)
            .await
            .map_err(|err| map_repo_error("student", err))?
            .ok_or_else(|| Error::not_found("student not found"))?;
        if student.status != StudentStatus::Active {
            return Err(Error::invalid_request("student is inactive"));
        }

        let rate = request.daily_rate.unwrap_or(self.daily_rate);
        if !rate.is_positive() {
            return Err(Error::invalid_request("daily rate must be positive"));
        }

        let order = LunchOrder::served_now(student.id, rate);
        let balance_after = self
            .orders
            .insert_with_debit(&order)
            .await
            .map_err(|err| map_repo_error("lunch order", err))?;

        if let Some(parent_id) = student.parent_id {
            if let Err(err) = self
                .notifier
                .lunch_served(parent_id, &student.name, rate, balance_after)
                .await
            {
                tracing::warn!(error = %err, "lunch-served notification failed");
            }
            if balance_after < rate {
                if let Err(err) = self
                    .notifier
                    .low_balance(parent_id, &student.name, balance_after)
                    .await
                {
                    tracing::warn!(error = %err, "low-balance notification failed");
                }
            }
        }

        tracing::info!(
            student_id = %student.id,
            amount = rate.minor(),
            balance_after = balance_after.minor(),
            "lunch served"
        );
        Ok(order)
    }

    async fn list_menu(&self, _caller: &Caller) -> Result<Vec<MenuItem>, Error> {
        self.menu
            .list()
            .await
            .map_err(|err| map_repo_error("menu", err))
    }

    async fn create_menu_item(
        &self,
        caller: &Caller,
        request: NewMenuItemRequest,
    ) -> Result<MenuItem, Error> {
        if !caller.is_admin() {
            return Err(Error::forbidden("admin access required"));
        }
        if request.name.trim().is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        if !request.price.is_positive() {
            return Err(Error::invalid_request("price must be positive"));
        }

        let item = MenuItem {
            id: MenuItemId::random(),
            name: request.name.trim().to_owned(),
            description: request.description,
            price: request.price,
            category: request.category.unwrap_or_else(|| "main".to_owned()),
            allergens: request.allergens,
            available: request.available,
            created_at: Utc::now(),
        };
        self.menu
            .insert(&item)
            .await
            .map_err(|err| map_repo_error("menu", err))?;
        Ok(item)
    }

    async fn list_orders(
        &self,
        caller: &Caller,
        filter: LunchOrderFilter,
    ) -> Result<Vec<LunchOrder>, Error> {
        if caller.is_admin() {
            let query = LunchOrderQuery {
                student_id: filter.student_id,
                date: filter.date,
            };
            return self
                .orders
                .list(&query)
                .await
                .map_err(|err| map_repo_error("lunch order", err));
        }

        if let Some(student_id) = filter.student_id {
            self.fetch_visible_student(caller, student_id).await?;
            let query = LunchOrderQuery {
                student_id: Some(student_id),
                date: filter.date,
            };
            return self
                .orders
                .list(&query)
                .await
                .map_err(|err| map_repo_error("lunch order", err));
        }

        // No student filter: gather across every student the parent owns.
        let students = self
            .students
            .list_by_parent(caller.id)
            .await
            .map_err(|err| map_repo_error("student", err))?;
        let mut all = Vec::new();
        for student in students {
            let query = LunchOrderQuery {
                student_id: Some(student.id),
                date: filter.date,
            };
            let mut orders = self
                .orders
                .list(&query)
                .await
                .map_err(|err| map_repo_error("lunch order", err))?;
            all.append(&mut orders);
        }
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn place_order(
        &self,
        caller: &Caller,
        request: PlaceOrderRequest,
    ) -> Result<LunchOrder, Error> {
        let student = self.fetch_visible_student(caller, request.student_id).await?;
        let item = self
            .menu
            .find_by_id(request.menu_item_id)
            .await
            .map_err(|err| map_repo_error("menu", err))?
            .ok_or_else(|| Error::not_found("menu item not found"))?;
        if !item.available {
            return Err(Error::invalid_request("menu item is not available"));
        }

        let now = Utc::now();
        let order = LunchOrder {
            id: crate::domain::LunchOrderId::random(),
            student_id: student.id,
            menu_item_id: Some(item.id),
            amount: item.price,
            status: LunchOrderStatus::Ordered,
            date: request.date.unwrap_or(now),
            special_instructions: request.special_instructions,
            created_at: now,
        };
        // The debit happens at serving time, not when the pick is recorded.
        self.orders
            .insert(&order)
            .await
            .map_err(|err| map_repo_error("lunch order", err))?;
        Ok(order)
    }

    async fn preferences(
        &self,
        caller: &Caller,
        student_id: StudentId,
    ) -> Result<LunchPreferences, Error> {
        self.fetch_visible_student(caller, student_id).await?;
        let prefs = self
            .preferences
            .find_by_student(student_id)
            .await
            .map_err(|err| map_repo_error("lunch preferences", err))?;
        Ok(prefs.unwrap_or_default())
    }

    async fn update_preferences(
        &self,
        caller: &Caller,
        student_id: StudentId,
        update: PreferencesUpdate,
    ) -> Result<LunchPreferences, Error> {
        self.fetch_visible_student(caller, student_id).await?;
        let mut prefs = self
            .preferences
            .find_by_student(student_id)
            .await
            .map_err(|err| map_repo_error("lunch preferences", err))?
            .unwrap_or_default();

        if let Some(dietary) = update.dietary {
            prefs.dietary = dietary;
        }
        if let Some(allergies) = update.allergies {
            prefs.allergies = allergies;
        }
        if let Some(favorites) = update.favorites {
            prefs.favorites = favorites;
        }

        self.preferences
            .upsert(student_id, &prefs)
            .await
            .map_err(|err| map_repo_error("lunch preferences", err))?;
        Ok(prefs)
    }
}
