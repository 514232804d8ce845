use serde_json::json;

use festival_server::utils::jwt::{Identity, TokenService};

use crate::common::{TestApp, routes};

mod submit {
    use super::*;

    #[tokio::test]
    async fn example_scenario_round_trips_through_the_listing() {
        let app = TestApp::spawn().await;
        let token = app.login("A@X.com", "p1").await;

        let res = app
            .post_with_token(
                routes::STUDENTS,
                &json!({"fullName": "Zara", "batchNumber": "BSCS21", "phoneNumber": "0300"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["submissionId"], 1);
        assert_eq!(
            res.body["message"],
            "Thank you! Your Cultural Day registration is received."
        );

        let list = app.get_with_token(routes::STUDENTS, &token).await;
        assert_eq!(list.status, 200);
        let submissions = list.body["submissions"].as_array().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0]["id"], 1);
        assert_eq!(submissions[0]["fullName"], "Zara");
        assert_eq!(submissions[0]["batchNumber"], "BSCS21");
        assert_eq!(submissions[0]["phoneNumber"], "0300");
        assert!(submissions[0]["department"].is_null());
        assert!(submissions[0]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn submission_is_owned_by_the_caller() {
        let app = TestApp::spawn().await;
        app.login("first@x.com", "p").await;
        let token = app.login("second@x.com", "p").await;

        app.submit(&token, "Ali").await;

        let admin = app
            .get_without_token(&format!(
                "{}?password={}",
                routes::ADMIN_SUBMISSIONS,
                crate::common::ADMIN_PASSWORD
            ))
            .await;
        assert_eq!(admin.body["submissions"][0]["userId"], 2);
        assert_eq!(admin.body["submissions"][0]["email"], "second@x.com");
    }

    #[tokio::test]
    async fn optional_fields_are_stored_and_blank_ones_become_null() {
        let app = TestApp::spawn().await;
        let token = app.login("a@x.com", "p1").await;

        let res = app
            .post_with_token(
                routes::STUDENTS,
                &json!({
                    "fullName": "Zara",
                    "batchNumber": "BSCS21",
                    "phoneNumber": "0300",
                    "department": "CS",
                    "interests": "",
                    "dietaryPreferences": "Vegetarian",
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let list = app.get_with_token(routes::STUDENTS, &token).await;
        let row = &list.body["submissions"][0];
        assert_eq!(row["department"], "CS");
        assert!(row["interests"].is_null());
        assert_eq!(row["dietaryPreferences"], "Vegetarian");
        assert!(row["societyAffiliation"].is_null());
    }

    #[tokio::test]
    async fn missing_full_name_is_rejected_without_a_row() {
        let app = TestApp::spawn().await;
        let token = app.login("a@x.com", "p1").await;

        let res = app
            .post_with_token(
                routes::STUDENTS,
                &json!({"batchNumber": "BSCS21", "phoneNumber": "0300"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "BAD_REQUEST");
        assert_eq!(
            res.body["message"],
            "Full name, batch number, and phone number are required."
        );
        assert_eq!(app.count_rows("students").await, 0);
    }

    #[tokio::test]
    async fn empty_phone_number_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.login("a@x.com", "p1").await;

        let res = app
            .post_with_token(
                routes::STUDENTS,
                &json!({"fullName": "Zara", "batchNumber": "BSCS21", "phoneNumber": ""}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.count_rows("students").await, 0);
    }

    #[tokio::test]
    async fn whitespace_required_field_is_stored_as_supplied() {
        let app = TestApp::spawn().await;
        let token = app.login("a@x.com", "p1").await;

        let res = app
            .post_with_token(
                routes::STUDENTS,
                &json!({"fullName": "Zara", "batchNumber": "BSCS21", "phoneNumber": "  "}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let list = app.get_with_token(routes::STUDENTS, &token).await;
        assert_eq!(list.body["submissions"][0]["phoneNumber"], "  ");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn newest_submission_comes_first() {
        let app = TestApp::spawn().await;
        let token = app.login("a@x.com", "p1").await;

        let ids = [
            app.submit(&token, "One").await,
            app.submit(&token, "Two").await,
            app.submit(&token, "Three").await,
        ];

        let list = app.get_with_token(routes::STUDENTS, &token).await;
        let rows = list.body["submissions"].as_array().unwrap();
        let listed: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(listed, [ids[2], ids[1], ids[0]]);

        let stamps: Vec<chrono::DateTime<chrono::Utc>> = rows
            .iter()
            .map(|r| r["createdAt"].as_str().unwrap().parse().unwrap())
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn every_account_sees_every_submission() {
        let app = TestApp::spawn().await;
        let alice = app.login("alice@x.com", "p").await;
        let bob = app.login("bob@x.com", "p").await;

        app.submit(&alice, "Alice").await;
        app.submit(&bob, "Bob").await;

        let list = app.get_with_token(routes::STUDENTS, &alice).await;
        assert_eq!(list.body["submissions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_database_lists_nothing() {
        let app = TestApp::spawn().await;
        let token = app.login("a@x.com", "p1").await;

        let list = app.get_with_token(routes::STUDENTS, &token).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body, json!({"submissions": []}));
    }
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::STUDENTS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn non_bearer_scheme_counts_as_missing() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_header(routes::STUDENTS, "Authorization", "Basic YTpi")
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::STUDENTS, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let app = TestApp::spawn().await;
        let forged = TokenService::new("some-other-secret")
            .unwrap()
            .issue(&Identity {
                account_id: 1,
                email: "a@x.com".into(),
            })
            .unwrap();

        let res = app
            .post_with_token(
                routes::STUDENTS,
                &json!({"fullName": "Zara", "batchNumber": "BSCS21", "phoneNumber": "0300"}),
                &forged,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
        assert_eq!(app.count_rows("students").await, 0);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let app = TestApp::spawn().await;
        let expired = TokenService::with_ttl(crate::common::JWT_SECRET, chrono::Duration::hours(-1))
            .unwrap()
            .issue(&Identity {
                account_id: 1,
                email: "a@x.com".into(),
            })
            .unwrap();

        let res = app.get_with_token(routes::STUDENTS, &expired).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
