//! Integration tests per gli endpoints delle offerte
//!
//! Test per:
//! - GET /offers, GET /offers/{id} (pubblici)
//! - GET /offers/company
//! - POST /offers
//! - PUT /offers/{id}
//! - DELETE /offers/{id}

mod common;

#[cfg(test)]
mod offer_tests {
    use super::common::*;
    use serde_json::{Value, json};

    // ============================================================
    // Test per GET /offers - list_offers
    // ============================================================

    #[tokio::test]
    async fn test_list_offers_is_public() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        create_offer(&server, &token, "Backend intern", "it").await;
        create_offer(&server, &token, "Marketing intern", "marketing").await;

        let response = server.get("/offers").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Value>>().len(), 2);
    }

    #[tokio::test]
    async fn test_list_offers_filters_and_paginates() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        for i in 0..3 {
            create_offer(&server, &token, &format!("Dev intern {}", i), "it").await;
        }
        create_offer(&server, &token, "Sales intern", "sales").await;

        let by_category = server
            .get("/offers")
            .add_query_param("category", "it")
            .await
            .json::<Vec<Value>>();
        assert_eq!(by_category.len(), 3);
        assert!(by_category.iter().all(|o| o["category"] == "it"));

        let page = server
            .get("/offers")
            .add_query_param("skip", 1)
            .add_query_param("limit", 2)
            .await
            .json::<Vec<Value>>();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["title"], "Dev intern 1");
    }

    // ============================================================
    // Test per GET /offers/{id} - get_offer
    // ============================================================

    #[tokio::test]
    async fn test_get_offer_by_id() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let offer = create_offer(&server, &token, "Backend intern", "it").await;

        let response = server.get(&format!("/offers/{}", offer["id"])).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["title"], "Backend intern");
        assert_eq!(body["features"], json!(["mentoring", "remote friday"]));
    }

    #[tokio::test]
    async fn test_get_offer_not_found() {
        let server = create_test_server(create_test_state());
        server.get("/offers/9999").await.assert_status_not_found();
    }

    // ============================================================
    // Test per POST /offers - create_offer
    // ============================================================

    #[tokio::test]
    async fn test_create_offer_requires_authentication() {
        let server = create_test_server(create_test_state());

        let response = server
            .post("/offers")
            .json(&json!({
                "title": "Backend intern",
                "description": "Rust",
                "category": "it",
                "duration": "6 months",
                "location": "Tunis",
                "price": "800"
            }))
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_student_cannot_create_offer() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Amel", "amel@uni.tn", "student").await;

        let response = server
            .post("/offers")
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Backend intern",
                "description": "Rust",
                "category": "it",
                "duration": "6 months",
                "location": "Tunis",
                "price": "800"
            }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_create_offer_validation_error() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;

        let response = server
            .post("/offers")
            .authorization_bearer(&token)
            .json(&json!({
                "title": "",
                "description": "Rust",
                "category": "it",
                "duration": "6 months",
                "location": "Tunis",
                "price": "800"
            }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_admin_without_profile_cannot_create_offer() {
        let server = create_test_server(create_test_state_allowing_admins());
        let (_, token) = register_and_login(&server, "Root", "root@platform.tn", "admin").await;

        let response = server
            .post("/offers")
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Backend intern",
                "description": "Rust",
                "category": "it",
                "duration": "6 months",
                "location": "Tunis",
                "price": "800"
            }))
            .await;

        // ruolo ammesso, ma manca il profilo aziendale
        response.assert_status_not_found();
    }

    // ============================================================
    // Test per GET /offers/company - list_company_offers
    // ============================================================

    #[tokio::test]
    async fn test_company_sees_only_its_offers() {
        let server = create_test_server(create_test_state());
        let (_, acme) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let (_, globex) = register_and_login(&server, "Globex", "hr@globex.tn", "company").await;
        create_offer(&server, &acme, "Acme intern", "it").await;
        create_offer(&server, &globex, "Globex intern", "it").await;

        let response = server.get("/offers/company").authorization_bearer(&acme).await;

        response.assert_status_ok();
        let offers = response.json::<Vec<Value>>();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0]["title"], "Acme intern");
    }

    // ============================================================
    // Test per PUT /offers/{id} - update_offer
    // ============================================================

    #[tokio::test]
    async fn test_owner_updates_offer() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let offer = create_offer(&server, &token, "Backend intern", "it").await;

        let response = server
            .put(&format!("/offers/{}", offer["id"]))
            .authorization_bearer(&token)
            .json(&json!({ "title": "Senior backend intern" }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["title"], "Senior backend intern");
        assert_eq!(body["category"], "it");
    }

    #[tokio::test]
    async fn test_other_company_cannot_update_offer() {
        let server = create_test_server(create_test_state());
        let (_, acme) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let (_, globex) = register_and_login(&server, "Globex", "hr@globex.tn", "company").await;
        let offer = create_offer(&server, &acme, "Backend intern", "it").await;

        let response = server
            .put(&format!("/offers/{}", offer["id"]))
            .authorization_bearer(&globex)
            .json(&json!({ "title": "Hijacked" }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_admin_updates_any_offer() {
        let server = create_test_server(create_test_state_allowing_admins());
        let (_, acme) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let (_, admin) = register_and_login(&server, "Root", "root@platform.tn", "admin").await;
        let offer = create_offer(&server, &acme, "Backend intern", "it").await;

        let response = server
            .put(&format!("/offers/{}", offer["id"]))
            .authorization_bearer(&admin)
            .json(&json!({ "location": "Remote" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["location"], "Remote");
    }

    #[tokio::test]
    async fn test_update_missing_offer_is_not_found() {
        let server = create_test_server(create_test_state());
        let (_, token) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;

        server
            .put("/offers/9999")
            .authorization_bearer(&token)
            .json(&json!({ "title": "Nothing" }))
            .await
            .assert_status_not_found();
    }

    // ============================================================
    // Test per DELETE /offers/{id} - delete_offer
    // ============================================================

    #[tokio::test]
    async fn test_delete_offer_cascades_applications() {
        let server = create_test_server(create_test_state());
        let (_, acme) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let (_, student) = register_and_login(&server, "Amel", "amel@uni.tn", "student").await;
        let offer = create_offer(&server, &acme, "Backend intern", "it").await;
        apply(&server, &student, offer["id"].as_i64().unwrap()).await.assert_status_ok();

        let response = server
            .delete(&format!("/offers/{}", offer["id"]))
            .authorization_bearer(&acme)
            .await;
        response.assert_status_ok();

        server.get(&format!("/offers/{}", offer["id"])).await.assert_status_not_found();
        let mine = server
            .get("/applications/my-applications")
            .authorization_bearer(&student)
            .await
            .json::<Vec<Value>>();
        assert!(mine.is_empty());
    }

    #[tokio::test]
    async fn test_student_cannot_delete_offer() {
        let server = create_test_server(create_test_state());
        let (_, acme) = register_and_login(&server, "Acme", "hr@acme.tn", "company").await;
        let (_, student) = register_and_login(&server, "Amel", "amel@uni.tn", "student").await;
        let offer = create_offer(&server, &acme, "Backend intern", "it").await;

        server
            .delete(&format!("/offers/{}", offer["id"]))
            .authorization_bearer(&student)
            .await
            .assert_status_forbidden();
    }
}
