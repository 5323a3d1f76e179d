//! Serving-line behaviour: the balance is the fold of credits and debits,
//! and handing over a meal is never blocked by an insufficient balance.

mod support;

use backend::domain::ports::{
    LunchOrderFilter, LunchService, ManualPaymentRequest, PaymentService, PlaceOrderRequest,
    ServeLunchRequest,
};
use backend::domain::{Amount, EligibilityStatus, LunchOrderStatus, NotificationType};

use support::{admin_user, inbox_of, menu_item, parent_user, student_of, World};

#[tokio::test]
async fn the_balance_folds_credits_and_debits_in_order() {
    let parent = parent_user("Ngozi Okafor", "ngozi@example.com");
    let admin = admin_user("Canteen Admin", "admin@example.com");
    let admin_caller = admin.to_caller();
    let student = student_of(parent.id, "Ada", Amount::ZERO);
    let student_id = student.id;
    let world = World::seeded(vec![parent, admin], vec![student], Vec::new());

    world
        .payment_service()
        .record_manual(
            &admin_caller,
            ManualPaymentRequest {
                student_id,
                amount: Amount::from_major(3_000),
                payment_type: "lunch_credit".to_owned(),
                category: None,
                description: None,
            },
        )
        .await
        .expect("manual credit succeeds");
    assert_eq!(world.students.balance_of(student_id), Amount::from_major(3_000));

    let lunch = world.lunch_service(Amount::from_major(1_000));
    for _ in 0..2 {
        let order = lunch
            .serve(
                &admin_caller,
                ServeLunchRequest {
                    student_id,
                    daily_rate: None,
                },
            )
            .await
            .expect("serving succeeds");
        assert_eq!(order.status, LunchOrderStatus::Served);
        assert_eq!(order.amount, Amount::from_major(1_000));
    }
    assert_eq!(world.students.balance_of(student_id), Amount::from_major(1_000));
    assert_eq!(world.orders.count(), 2);

    let report = lunch
        .eligibility_report(&admin_caller)
        .await
        .expect("report succeeds");
    let row = report
        .iter()
        .find(|row| row.student_id == student_id)
        .expect("student appears in the report");
    assert_eq!(row.balance, Amount::from_major(1_000));
    assert_eq!(row.status, EligibilityStatus::Eligible);
}

#[tokio::test]
async fn serving_continues_into_a_negative_balance() {
    let parent = parent_user("Ngozi Okafor", "ngozi@example.com");
    let parent_caller = parent.to_caller();
    let admin = admin_user("Canteen Admin", "admin@example.com");
    let admin_caller = admin.to_caller();
    let student = student_of(parent.id, "Ada", Amount::from_major(1_200));
    let student_id = student.id;
    let world = World::seeded(vec![parent, admin], vec![student], Vec::new());

    let lunch = world.lunch_service(Amount::from_major(1_000));
    lunch
        .serve(
            &admin_caller,
            ServeLunchRequest {
                student_id,
                daily_rate: None,
            },
        )
        .await
        .expect("first serving succeeds");
    assert_eq!(world.students.balance_of(student_id), Amount::from_major(200));

    // The second meal is still handed over; the balance goes negative.
    lunch
        .serve(
            &admin_caller,
            ServeLunchRequest {
                student_id,
                daily_rate: None,
            },
        )
        .await
        .expect("second serving succeeds");
    assert_eq!(world.students.balance_of(student_id), Amount::from_major(-800));
    assert_eq!(world.orders.count(), 2);

    let report = lunch
        .eligibility_report(&admin_caller)
        .await
        .expect("report succeeds");
    let row = report
        .iter()
        .find(|row| row.student_id == student_id)
        .expect("student appears in the report");
    assert_eq!(row.status, EligibilityStatus::Ineligible);

    let inbox = inbox_of(&world, &parent_caller).await;
    assert!(
        inbox
            .iter()
            .any(|notification| notification.kind == NotificationType::Lunch),
        "the parent hears about the servings and the low balance"
    );
}

#[tokio::test]
async fn a_rate_override_debits_the_overridden_amount() {
    let parent = parent_user("Ngozi Okafor", "ngozi@example.com");
    let admin = admin_user("Canteen Admin", "admin@example.com");
    let admin_caller = admin.to_caller();
    let student = student_of(parent.id, "Ada", Amount::from_major(2_000));
    let student_id = student.id;
    let world = World::seeded(vec![parent, admin], vec![student], Vec::new());

    let lunch = world.lunch_service(Amount::from_major(1_000));
    let order = lunch
        .serve(
            &admin_caller,
            ServeLunchRequest {
                student_id,
                daily_rate: Some(Amount::from_major(1_500)),
            },
        )
        .await
        .expect("serving succeeds");
    assert_eq!(order.amount, Amount::from_major(1_500));
    assert_eq!(world.students.balance_of(student_id), Amount::from_major(500));
}

#[tokio::test]
async fn placed_orders_record_the_pick_without_debiting() {
    let parent = parent_user("Ngozi Okafor", "ngozi@example.com");
    let parent_caller = parent.to_caller();
    let student = student_of(parent.id, "Ada", Amount::from_major(2_000));
    let student_id = student.id;
    let item = menu_item("Jollof rice", Amount::from_major(800));
    let item_id = item.id;
    let world = World::seeded(vec![parent], vec![student], vec![item]);

    let lunch = world.lunch_service(Amount::from_major(1_000));
    let order = lunch
        .place_order(
            &parent_caller,
            PlaceOrderRequest {
                student_id,
                menu_item_id: item_id,
                special_instructions: Some("no pepper".to_owned()),
                date: None,
            },
        )
        .await
        .expect("order placement succeeds");
    assert_eq!(order.status, LunchOrderStatus::Ordered);
    assert_eq!(order.amount, Amount::from_major(800));
    assert_eq!(world.students.balance_of(student_id), Amount::from_major(2_000));

    let orders = lunch
        .list_orders(
            &parent_caller,
            LunchOrderFilter {
                student_id: Some(student_id),
                date: None,
            },
        )
        .await
        .expect("listing succeeds");
    assert_eq!(orders.len(), 1);
}
