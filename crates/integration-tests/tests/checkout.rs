//! Submitting a cart through the real client against the mock API.

#![allow(clippy::unwrap_used)]

use tillpoint_client::ApiError;
use tillpoint_client::pos::{Cart, Checkout, CheckoutError, CheckoutState, SaleDetails};
use tillpoint_core::{Money, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId};
use tillpoint_integration_tests::{INITIAL_ACCESS, MockApi, REFRESH_TOKEN, product_record};

struct Fixture {
    mock: MockApi,
    shea: ProductId,
    soap: ProductId,
}

async fn fixture() -> Fixture {
    let shea = uuid::Uuid::new_v4();
    let soap = uuid::Uuid::new_v4();
    let mock = MockApi::start(vec![
        product_record(shea, "Shea butter", "15.00", 5),
        product_record(soap, "Black soap", "4.50", 40),
    ])
    .await;
    Fixture {
        mock,
        shea: ProductId::new(shea),
        soap: ProductId::new(soap),
    }
}

#[tokio::test]
async fn test_successful_sale_clears_cart() {
    let f = fixture().await;
    let (client, _) = f.mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let mut cart = Cart::new();
    cart.add_item(&client.get_product(f.shea).await.unwrap(), 2)
        .unwrap();
    cart.add_item(&client.get_product(f.soap).await.unwrap(), 3)
        .unwrap();
    assert_eq!(cart.total(), Money::parse("43.50").unwrap());

    let mut details = SaleDetails::new(PaymentMethod::Card);
    details.customer_name = "Kofi".to_string();
    details.tax_amount = Money::parse("2.00").unwrap();

    let mut checkout = Checkout::new();
    let order = checkout.submit(&mut cart, &details, &client).await.unwrap();

    assert!(cart.is_empty());
    assert_eq!(checkout.state(), &CheckoutState::Success(order.id));
    assert_eq!(order.id, OrderId::new(501));
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.served_by, "POS System");
    assert_eq!(order.item_count(), 5);
    assert_eq!(order.subtotal, Money::parse("43.50").unwrap());

    let sent = f.mock.state.last_order.lock().unwrap().clone().unwrap();
    assert_eq!(sent["payment_method"], "card");
    assert_eq!(sent["customer_name"], "Kofi");
    assert_eq!(sent["tax_amount"], "2.00");
    assert_eq!(sent["items"][0]["product_id"], f.shea.to_string());
    assert_eq!(sent["items"][0]["quantity"], 2);
    assert_eq!(sent["items"][0]["price"], "15.00");
}

#[tokio::test]
async fn test_rejected_sale_keeps_cart() {
    let f = fixture().await;
    f.mock.reject_orders(true);
    let (client, _) = f.mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let mut cart = Cart::new();
    cart.add_item(&client.get_product(f.shea).await.unwrap(), 5)
        .unwrap();
    let before = cart.clone();

    let mut checkout = Checkout::new();
    let err = checkout
        .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &client)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Api(ApiError::Status { status, .. }) if status == reqwest::StatusCode::BAD_REQUEST
    ));
    assert_eq!(cart, before);
    assert!(matches!(
        checkout.state(),
        CheckoutState::Failed(message) if message.contains("Insufficient stock")
    ));
    assert_eq!(f.mock.order_calls(), 1);
}

#[tokio::test]
async fn test_sale_survives_expired_token() {
    let f = fixture().await;
    let (client, _) = f.mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let mut cart = Cart::new();
    cart.add_item(&client.get_product(f.soap).await.unwrap(), 1)
        .unwrap();

    f.mock.expire_access_token();
    let mut checkout = Checkout::new();
    let order = checkout
        .submit(&mut cart, &SaleDetails::new(PaymentMethod::Cash), &client)
        .await
        .unwrap();

    assert_eq!(order.item_count(), 1);
    assert_eq!(f.mock.refresh_calls(), 1);
    assert_eq!(f.mock.order_calls(), 1);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_recorded_sale_with_unreadable_response_is_not_resubmitted() {
    let f = fixture().await;
    f.mock.garble_order_total(true);
    let (client, _) = f.mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let mut cart = Cart::new();
    cart.add_item(&client.get_product(f.shea).await.unwrap(), 1)
        .unwrap();

    let mut checkout = Checkout::new();
    let details = SaleDetails::new(PaymentMethod::Cash);
    let err = checkout.submit(&mut cart, &details, &client).await.unwrap_err();

    match err {
        CheckoutError::ReceiptUnreadable { order_id, source } => {
            assert_eq!(order_id, OrderId::new(501));
            assert_eq!(source.field, "total");
            assert_eq!(source.value, "n/a");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(checkout.state(), &CheckoutState::Success(OrderId::new(501)));
    assert!(cart.is_empty());

    checkout.reset();
    let again = checkout.submit(&mut cart, &details, &client).await.unwrap_err();
    assert!(matches!(again, CheckoutError::EmptyCart));
    assert_eq!(f.mock.order_calls(), 1);
}

#[tokio::test]
async fn test_empty_cart_never_reaches_server() {
    let f = fixture().await;
    let (client, _) = f.mock.client(Some(INITIAL_ACCESS), Some(REFRESH_TOKEN));

    let mut checkout = Checkout::new();
    let err = checkout
        .submit(&mut Cart::new(), &SaleDetails::new(PaymentMethod::Cash), &client)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(checkout.state(), &CheckoutState::Idle);
    assert_eq!(f.mock.order_calls(), 0);
}
