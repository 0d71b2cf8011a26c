use crate::utils::{USER_ID, new_account, new_mock_client_and_server};
use campact_user_service::Account;
use campact_user_service::mocks::account::{get_account, get_account_path_status};
use serde_json::json;

mod utils;

#[test]
fn exists_when_account_has_id() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account(&mut server, USER_ID, &json!({"id": "id-123"}));

    assert!(new_account(client).exists().unwrap());
}

#[test]
fn does_not_exist_for_error_document() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account(&mut server, USER_ID, &json!({"error": true}));

    assert!(!new_account(client).exists().unwrap());
}

#[test]
fn control_characters_in_user_id_are_escaped() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account_path_status(&mut server, "/v1/accounts/%09%0D", 404);

    let account = Account::new(client, "\t\r");
    assert!(!account.exists().unwrap());
}

#[test]
fn slash_in_user_id_is_escaped() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock =
        get_account_path_status(&mut server, "/v1/accounts/foo@example.com%2Fsecrets", 404);

    let account = Account::new(client, "foo@example.com/secrets");
    assert!(!account.exists().unwrap());
}

#[test]
fn not_found_account_has_no_fields() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account_path_status(&mut server, "/v1/accounts/test@example.org", 404);

    let account = new_account(client);
    assert!(!account.exists().unwrap());
    assert_eq!(account.name().unwrap(), None);
    assert_eq!(account.email().unwrap(), None);
    assert!(!account.subscribed_to_newsletter().unwrap());
    assert!(!account.allow_prefill().unwrap());
}

#[test]
fn name() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account(
        &mut server,
        USER_ID,
        &json!({
            "name": {
                "firstname": "Alice",
                "lastname": "Wu",
                "gender": "female",
                "title": "PhD",
                "fullname": "PhD Alice Wu"
            }
        }),
    );

    let name = new_account(client).name().unwrap().unwrap();
    assert_eq!(name["firstname"], "Alice");
    assert_eq!(name["lastname"], "Wu");
    assert_eq!(name["gender"], "female");
    assert_eq!(name["title"], "PhD");
    assert_eq!(name["fullname"], "PhD Alice Wu");
}

#[test]
fn email() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account(
        &mut server,
        USER_ID,
        &json!({"emailaddress": {"emailaddress": "foobar@example.com"}}),
    );

    assert_eq!(
        new_account(client).email().unwrap().as_deref(),
        Some("foobar@example.com")
    );
}

#[test]
fn email_missing() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account(&mut server, USER_ID, &json!({"emailaddress": {}}));

    assert_eq!(new_account(client).email().unwrap(), None);
}

#[test]
fn address_preferences_and_donor_info() {
    let (client, mut server) = new_mock_client_and_server();
    let _mock = get_account(
        &mut server,
        USER_ID,
        &json!({
            "postaladdress": {
                "street": "123 Fake Street",
                "postalcode": "E1234",
                "locality": "London",
                "countrycode": "GB"
            },
            "preferences": {"prefill_forms": "undecided"},
            "donorclass": {"type": "regular"}
        }),
    );

    let account = new_account(client);
    let address = account.address().unwrap().unwrap();
    assert_eq!(address["street"], "123 Fake Street");
    assert_eq!(address["countrycode"], "GB");
    assert_eq!(
        account.preferences().unwrap(),
        Some(json!({"prefill_forms": "undecided"}))
    );
    assert_eq!(
        account.donor_info().unwrap(),
        Some(json!({"type": "regular"}))
    );
}

#[test]
fn subscribed_to_newsletter() {
    let cases = [
        (json!([{"type": "newsletter"}]), true),
        (json!([{"type": "foo"}, {"type": "newsletter"}]), true),
        (json!([]), false),
        (json!([{"type": "foo"}]), false),
        (json!(["newsletter"]), false),
        (json!(null), false),
    ];

    for (subscriptions, expected) in cases {
        let (client, mut server) = new_mock_client_and_server();
        let _mock = get_account(
            &mut server,
            USER_ID,
            &json!({
                "emailaddress": {
                    "emailaddress": "foobar@example.com",
                    "subscriptions": subscriptions.clone()
                }
            }),
        );

        assert_eq!(
            new_account(client).subscribed_to_newsletter().unwrap(),
            expected,
            "subscriptions {subscriptions}"
        );
    }
}

#[test]
fn allow_prefill() {
    let cases = [
        (json!("allowed"), true),
        (json!("undecided"), false),
        (json!("disallowed"), false),
        (json!(true), false),
        (json!(null), false),
    ];

    for (prefill, expected) in cases {
        let (client, mut server) = new_mock_client_and_server();
        let _mock = get_account(
            &mut server,
            USER_ID,
            &json!({"preferences": {"prefill_forms": prefill.clone()}}),
        );

        assert_eq!(
            new_account(client).allow_prefill().unwrap(),
            expected,
            "prefill_forms {prefill}"
        );
    }
}

#[test]
fn document_is_fetched_once() {
    let (client, mut server) = new_mock_client_and_server();
    let mock = get_account(
        &mut server,
        USER_ID,
        &json!({
            "id": "id-123",
            "emailaddress": {"emailaddress": "foobar@example.com"},
            "preferences": {"prefill_forms": "allowed"}
        }),
    );

    let account = new_account(client);
    assert!(account.exists().unwrap());
    assert_eq!(
        account.email().unwrap().as_deref(),
        Some("foobar@example.com")
    );
    assert!(account.allow_prefill().unwrap());
    assert!(!account.subscribed_to_newsletter().unwrap());
    mock.assert();
}

#[test]
fn views_share_one_client() {
    let (client, mut server) = new_mock_client_and_server();
    let _first = get_account(&mut server, USER_ID, &json!({"id": "id-123"}));
    let _second = get_account(&mut server, "other@example.org", &json!({}));

    let first = new_account(client.clone());
    let second = Account::new(client, "other@example.org");
    assert!(first.exists().unwrap());
    assert!(!second.exists().unwrap());
    assert!(std::sync::Arc::ptr_eq(first.client(), second.client()));
}
