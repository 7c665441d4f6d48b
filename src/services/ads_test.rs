use super::*;
use crate::state::test_helpers::{self, ad, seed, user};

fn request(plots: &[&str], message: &str, image_url: &str) -> PurchaseRequest {
    PurchaseRequest {
        plots: plots.iter().map(|p| (*p).to_owned()).collect(),
        message: message.into(),
        image_url: image_url.into(),
    }
}

fn valid(plots: &[&str]) -> Purchase {
    validate_purchase(&request(plots, "hello", "https://cdn.test/a.png")).unwrap()
}

fn cell(id: &str) -> CellId {
    id.parse().unwrap()
}

// =============================================================================
// validate_purchase
// =============================================================================

#[test]
fn accepts_solid_rectangle_and_trims_text() {
    let purchase = validate_purchase(&request(&["1-3", "1-2", "2-2", "2-3"], "  buy now  ", " https://x.test/a.png ")).unwrap();
    assert_eq!(purchase.plots.len(), 4);
    assert_eq!(purchase.plots.first(), Some(&cell("1-2")));
    assert_eq!(purchase.message, "buy now");
    assert_eq!(purchase.image_url, "https://x.test/a.png");
}

#[test]
fn rejects_empty_plot_list() {
    let err = validate_purchase(&request(&[], "m", "https://x.test/a.png")).unwrap_err();
    assert!(matches!(err, AdError::Invalid(_)));
}

#[test]
fn rejects_malformed_and_out_of_range_ids() {
    for bad in ["3", "a-b", "14-0", "0-28", ""] {
        let err = validate_purchase(&request(&[bad], "m", "https://x.test/a.png")).unwrap_err();
        assert!(matches!(err, AdError::Invalid(_)), "{bad:?} should be invalid");
    }
}

#[test]
fn rejects_duplicates() {
    let err = validate_purchase(&request(&["0-0", "0-0"], "m", "https://x.test/a.png")).unwrap_err();
    assert!(matches!(err, AdError::Invalid(msg) if msg.contains("twice")));
}

#[test]
fn rejects_non_rectangle() {
    let err = validate_purchase(&request(&["0-0", "1-1"], "m", "https://x.test/a.png")).unwrap_err();
    assert!(matches!(err, AdError::NotRectangular));

    let l_shape = ["0-0", "0-1", "1-0"];
    let err = validate_purchase(&request(&l_shape, "m", "https://x.test/a.png")).unwrap_err();
    assert!(matches!(err, AdError::NotRectangular));
}

#[test]
fn message_limits() {
    let blank = validate_purchase(&request(&["0-0"], "   ", "https://x.test/a.png")).unwrap_err();
    assert!(matches!(blank, AdError::Invalid(_)));

    let exact = "é".repeat(MAX_MESSAGE_CHARS);
    assert!(validate_purchase(&request(&["0-0"], &exact, "https://x.test/a.png")).is_ok());

    let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
    let err = validate_purchase(&request(&["0-0"], &long, "https://x.test/a.png")).unwrap_err();
    assert!(matches!(err, AdError::Invalid(_)));
}

#[test]
fn image_url_must_be_http() {
    for bad in ["", "  ", "ftp://x/a.png", "javascript:alert(1)"] {
        let err = validate_purchase(&request(&["0-0"], "m", bad)).unwrap_err();
        assert!(matches!(err, AdError::Invalid(_)), "{bad:?} should be invalid");
    }
}

// =============================================================================
// availability and quota
// =============================================================================

#[test]
fn check_available_lists_taken_plots() {
    let ads = vec![ad(&["0-1", "1-1"], None)];
    let err = check_available(&ads, &valid(&["0-0", "0-1", "1-0", "1-1"]).plots).unwrap_err();
    assert!(matches!(err, AdError::Overlap(cells) if cells == vec![cell("0-1"), cell("1-1")]));
    assert!(check_available(&ads, &valid(&["5-5"]).plots).is_ok());
}

#[test]
fn quota_counts_only_own_ads() {
    let buyer = user(false);
    let ads = vec![ad(&["0-0"], Some(buyer.id)), ad(&["0-1"], None), ad(&["0-2"], Some(Uuid::new_v4()))];
    assert!(check_quota(&ads, &buyer, 2).is_ok());
    assert!(matches!(check_quota(&ads, &buyer, 1), Err(AdError::QuotaExceeded { limit: 1 })));
}

#[test]
fn admins_are_exempt_from_quota() {
    let admin = user(true);
    let ads = vec![ad(&["0-0"], Some(admin.id)), ad(&["0-1"], Some(admin.id))];
    assert!(check_quota(&ads, &admin, 1).is_ok());
}

#[tokio::test]
async fn create_rejects_overlap_before_touching_database() {
    let state = test_helpers::test_app_state();
    seed(&state, vec![ad(&["3-4"], None)]).await;

    let err = create_ad(&state, &user(false), valid(&["2-3", "2-4", "3-3", "3-4"])).await.unwrap_err();
    assert!(matches!(err, AdError::Overlap(cells) if cells == vec![cell("3-4")]));
    assert_eq!(list_ads(&state).await.len(), 1);
}

#[tokio::test]
async fn create_rejects_user_at_quota() {
    let state = test_helpers::test_app_state();
    let buyer = user(false);
    seed(&state, vec![ad(&["0-0"], Some(buyer.id)), ad(&["0-1"], Some(buyer.id))]).await;

    let err = create_ad(&state, &buyer, valid(&["5-5"])).await.unwrap_err();
    assert!(matches!(err, AdError::QuotaExceeded { limit: 2 }));
}

// =============================================================================
// delete
// =============================================================================

#[tokio::test]
async fn delete_requires_admin() {
    let state = test_helpers::test_app_state();
    let existing = ad(&["0-0"], None);
    seed(&state, vec![existing.clone()]).await;

    let err = delete_ad(&state, &user(false), existing.id).await.unwrap_err();
    assert!(matches!(err, AdError::Forbidden));
    assert_eq!(list_ads(&state).await.len(), 1);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let state = test_helpers::test_app_state();
    let missing = Uuid::new_v4();
    let err = delete_ad(&state, &user(true), missing).await.unwrap_err();
    assert!(matches!(err, AdError::NotFound(id) if id == missing));
}

// =============================================================================
// feed
// =============================================================================

#[tokio::test]
async fn subscribe_returns_snapshot_then_live_events() {
    let state = test_helpers::test_app_state();
    let first = ad(&["0-0"], None);
    seed(&state, vec![first.clone()]).await;

    let (snapshot, mut rx) = subscribe(&state).await;
    assert_eq!(snapshot, vec![first.clone()]);

    publish(&state, AdEvent::Deleted { ad_id: first.id });
    assert_eq!(rx.recv().await.unwrap(), AdEvent::Deleted { ad_id: first.id });
}

#[tokio::test]
async fn publish_without_subscribers_is_harmless() {
    let state = test_helpers::test_app_state();
    publish(&state, AdEvent::Deleted { ad_id: Uuid::nil() });
}

#[test]
fn events_serialize_with_type_tag() {
    let json = serde_json::to_value(AdEvent::Deleted { ad_id: Uuid::nil() }).unwrap();
    assert_eq!(json["type"], "deleted");
    assert_eq!(json["ad_id"], Uuid::nil().to_string());

    let created = serde_json::to_value(AdEvent::Created { ad: ad(&["0-1", "0-0"], None) }).unwrap();
    assert_eq!(created["type"], "created");
    assert_eq!(created["ad"]["plots"], serde_json::json!(["0-0", "0-1"]));
}

// =============================================================================
// hydration
// =============================================================================

fn row(plots: &[&str]) -> AdRow {
    AdRow {
        id: Uuid::new_v4(),
        owner_id: None,
        image_url: "https://cdn.test/a.png".into(),
        message: "m".into(),
        plots: plots.iter().map(|p| (*p).to_owned()).collect(),
    }
}

#[test]
fn ad_from_row_sorts_plots() {
    let parsed = ad_from_row(row(&["1-1", "0-0", "0-1", "1-0"])).unwrap();
    assert_eq!(parsed.top_left(), Some(cell("0-0")));
    assert_eq!(parsed.plots.len(), 4);
}

#[test]
fn ad_from_row_rejects_empty_and_malformed() {
    assert!(ad_from_row(row(&[])).is_err());
    assert!(ad_from_row(row(&["0-0", "nope"])).is_err());
    assert!(ad_from_row(row(&["99-0"])).is_err());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(AdError::NotRectangular.error_code(), "E_AD_NOT_RECTANGULAR");
    assert_eq!(AdError::Overlap(vec![]).error_code(), "E_AD_OVERLAP");
    assert_eq!(AdError::Forbidden.error_code(), "E_FORBIDDEN");
}

#[test]
fn overlap_message_lists_cells() {
    let err = AdError::Overlap(vec![cell("0-1"), cell("2-3")]);
    assert_eq!(err.to_string(), "plots already taken: 0-1, 2-3");
}
