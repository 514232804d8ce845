use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;

use crate::common::{ADMIN_PASSWORD, TestApp, routes};

async fn app_with_two_submissions() -> TestApp {
    let app = TestApp::spawn().await;
    let alice = app.login("alice@x.com", "p").await;
    let bob = app.login("bob@x.com", "p").await;
    app.submit(&alice, "Alice").await;
    app.submit(&bob, "Bob").await;
    app
}

mod login {
    use super::*;

    #[tokio::test]
    async fn correct_password_returns_the_encoded_secret() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ADMIN_LOGIN, &json!({"password": ADMIN_PASSWORD}))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["token"], STANDARD.encode(ADMIN_PASSWORD));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::ADMIN_LOGIN, &json!({"password": "guess"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
        assert!(res.body.get("token").is_none());
    }

    #[tokio::test]
    async fn missing_password_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::ADMIN_LOGIN, &json!({})).await;

        assert_eq!(res.status, 401);
    }
}

mod submissions {
    use super::*;

    #[tokio::test]
    async fn query_parameter_grants_access_with_owner_emails() {
        let app = app_with_two_submissions().await;

        let res = app
            .get_without_token(&format!(
                "{}?password={ADMIN_PASSWORD}",
                routes::ADMIN_SUBMISSIONS
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 2);
        let rows = res.body["submissions"].as_array().unwrap();
        assert_eq!(rows[0]["fullName"], "Bob");
        assert_eq!(rows[0]["email"], "bob@x.com");
        assert_eq!(rows[0]["userId"], 2);
        assert_eq!(rows[1]["email"], "alice@x.com");
    }

    #[tokio::test]
    async fn header_grants_access() {
        let app = app_with_two_submissions().await;

        let res = app
            .get_with_header(routes::ADMIN_SUBMISSIONS, "X-Admin-Password", ADMIN_PASSWORD)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 2);
    }

    #[tokio::test]
    async fn empty_query_value_falls_through_to_the_header() {
        let app = app_with_two_submissions().await;

        let res = app
            .get_with_header(
                &format!("{}?password=", routes::ADMIN_SUBMISSIONS),
                "X-Admin-Password",
                ADMIN_PASSWORD,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 2);
    }

    #[tokio::test]
    async fn empty_query_value_falls_through_to_the_bearer_token() {
        let app = app_with_two_submissions().await;
        let token = STANDARD.encode(ADMIN_PASSWORD);

        let res = app
            .get_with_token(&format!("{}?password=", routes::ADMIN_SUBMISSIONS), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
    }

    #[tokio::test]
    async fn admin_login_token_grants_access() {
        let app = app_with_two_submissions().await;
        let login = app
            .post_without_token(routes::ADMIN_LOGIN, &json!({"password": ADMIN_PASSWORD}))
            .await;
        let token = login.body["token"].as_str().unwrap();

        let res = app.get_with_token(routes::ADMIN_SUBMISSIONS, token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["total"], 2);
    }

    #[tokio::test]
    async fn wrong_secret_leaks_nothing() {
        let app = app_with_two_submissions().await;

        let res = app
            .get_without_token(&format!("{}?password=wrong", routes::ADMIN_SUBMISSIONS))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
        assert!(res.body.get("submissions").is_none());
        assert!(!res.text.contains("alice@x.com"));
    }

    #[tokio::test]
    async fn student_token_is_not_an_admin_credential() {
        let app = app_with_two_submissions().await;
        let student = app.login("alice@x.com", "p").await;

        let res = app.get_with_token(routes::ADMIN_SUBMISSIONS, &student).await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn no_credential_is_unauthorized() {
        let app = app_with_two_submissions().await;

        let res = app.get_without_token(routes::ADMIN_SUBMISSIONS).await;

        assert_eq!(res.status, 401);
    }
}

mod export {
    use super::*;

    #[tokio::test]
    async fn export_is_a_json_attachment() {
        let app = app_with_two_submissions().await;

        let res = app
            .get_with_header(routes::ADMIN_EXPORT, "X-Admin-Password", ADMIN_PASSWORD)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            res.header("content-disposition"),
            Some("attachment; filename=\"submissions.json\"")
        );
        assert!(
            res.header("content-type")
                .is_some_and(|ct| ct.starts_with("application/json"))
        );
        let rows = res.body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["email"], "bob@x.com");
    }

    #[tokio::test]
    async fn export_requires_the_secret() {
        let app = app_with_two_submissions().await;

        let res = app.get_without_token(routes::ADMIN_EXPORT).await;

        assert_eq!(res.status, 401);
        assert!(res.header("content-disposition").is_none());
    }
}
