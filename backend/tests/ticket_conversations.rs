//! Support ticket conversations over stateful in-memory adapters: status
//! transitions, the first-response stamp, and the notifications each side
//! receives.

mod support;

use backend::domain::ports::{NewTicketRequest, SupportService};
use backend::domain::{NotificationType, TicketPriority, TicketStatus};

use support::{admin_user, inbox_of, parent_user, World};

fn ticket_request(subject: &str, message: &str) -> NewTicketRequest {
    NewTicketRequest {
        subject: subject.to_owned(),
        message: message.to_owned(),
        priority: TicketPriority::default(),
        attachment_path: None,
    }
}

#[tokio::test]
async fn a_conversation_moves_the_ticket_and_notifies_both_sides() {
    let parent = parent_user("Ngozi Okafor", "ngozi@example.com");
    let parent_caller = parent.to_caller();
    let admin = admin_user("Canteen Admin", "admin@example.com");
    let admin_caller = admin.to_caller();
    let world = World::seeded(vec![parent, admin], Vec::new(), Vec::new());

    let service = world.support_service();
    let opened = service
        .create(
            &parent_caller,
            ticket_request("Wrong balance", "Ada's balance looks short by 500"),
        )
        .await
        .expect("ticket opens");
    let ticket_id = opened.ticket.id;
    assert_eq!(opened.ticket.status, TicketStatus::Open);

    let admin_inbox = inbox_of(&world, &admin_caller).await;
    assert!(
        admin_inbox
            .iter()
            .any(|notification| notification.kind == NotificationType::Support),
        "admins hear about the new ticket"
    );

    let responded = service
        .respond(&admin_caller, ticket_id, "Checking the ledger now".to_owned())
        .await
        .expect("admin responds");
    assert_eq!(responded.ticket.status, TicketStatus::InProgress);
    assert_eq!(
        responded.ticket.admin_response.as_deref(),
        Some("Checking the ledger now")
    );
    assert_eq!(responded.replies.len(), 1);

    let parent_inbox = inbox_of(&world, &parent_caller).await;
    assert!(
        parent_inbox
            .iter()
            .any(|notification| notification.kind == NotificationType::Support),
        "the parent hears about the response"
    );

    // A parent reply reopens the conversation.
    let reopened = service
        .reply(&parent_caller, ticket_id, "Still looks short".to_owned())
        .await
        .expect("parent replies");
    assert_eq!(reopened.ticket.status, TicketStatus::Open);
    assert_eq!(reopened.replies.len(), 2);

    // Only the first admin response is stamped on the ticket summary.
    let second = service
        .respond(&admin_caller, ticket_id, "Found it, refund issued".to_owned())
        .await
        .expect("admin responds again");
    assert_eq!(
        second.ticket.admin_response.as_deref(),
        Some("Checking the ledger now")
    );
    assert_eq!(second.replies.len(), 3);

    let resolved = service
        .set_status(&admin_caller, ticket_id, TicketStatus::Resolved)
        .await
        .expect("status change succeeds");
    assert_eq!(resolved.ticket.status, TicketStatus::Resolved);
}

#[tokio::test]
async fn parents_see_their_own_tickets_and_admins_see_all() {
    let first = parent_user("Ngozi Okafor", "ngozi@example.com");
    let first_caller = first.to_caller();
    let second = parent_user("Bola Adeyemi", "bola@example.com");
    let second_caller = second.to_caller();
    let admin = admin_user("Canteen Admin", "admin@example.com");
    let admin_caller = admin.to_caller();
    let world = World::seeded(vec![first, second, admin], Vec::new(), Vec::new());

    let service = world.support_service();
    service
        .create(&first_caller, ticket_request("Balance", "short by 500"))
        .await
        .expect("first ticket opens");
    service
        .create(&second_caller, ticket_request("Menu", "no vegetarian option"))
        .await
        .expect("second ticket opens");

    let first_list = service
        .list(&first_caller)
        .await
        .expect("listing succeeds");
    assert_eq!(first_list.len(), 1);
    assert_eq!(first_list[0].ticket.subject, "Balance");

    let admin_list = service.list(&admin_caller).await.expect("listing succeeds");
    assert_eq!(admin_list.len(), 2);
}

#[tokio::test]
async fn other_parents_tickets_read_as_absent() {
    let owner = parent_user("Ngozi Okafor", "ngozi@example.com");
    let owner_caller = owner.to_caller();
    let other = parent_user("Bola Adeyemi", "bola@example.com");
    let other_caller = other.to_caller();
    let world = World::seeded(vec![owner, other], Vec::new(), Vec::new());

    let service = world.support_service();
    let opened = service
        .create(&owner_caller, ticket_request("Balance", "short by 500"))
        .await
        .expect("ticket opens");

    let error = service
        .reply(&other_caller, opened.ticket.id, "me too".to_owned())
        .await
        .expect_err("foreign ticket reads as absent");
    assert_eq!(error.code(), backend::domain::ErrorCode::NotFound);
}
