mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_assign_and_move_status() -> Result<()> {
    let Some(org) = common::seeded_org().await? else { return Ok(()) };
    let company_id = org.company("Acme Foods").await?;

    let (status, body) = org
        .post(
            &org.admin,
            "/api/collaborations",
            json!({
                "title": "Summer reel",
                "company_id": company_id,
                "assigned_influencer_id": org.influencer.profile_id,
                "deadline": "2099-06-01"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let data = &body["data"];
    assert_eq!(data["status"], "requested");
    assert_eq!(data["company"]["name"], "Acme Foods");
    assert_eq!(data["assigned_influencer"]["full_name"], "Ines Influencer");
    assert_eq!(data["is_overdue"], false);
    let id = data["id"].as_str().unwrap().to_string();

    // The assigned influencer may move the status but not edit the record
    let (status, body) = org
        .patch(&org.influencer, &format!("/api/collaborations/{}/status", id), json!({ "status": "in_progress" }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "in_progress");

    let (status, _) = org
        .put(&org.influencer, &format!("/api/collaborations/{}", id), json!({ "title": "Mine now" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = org
        .patch(&org.brand, &format!("/api/collaborations/{}/status", id), json!({ "status": "completed" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = org
        .put(&org.admin, &format!("/api/collaborations/{}", id), json!({ "notes": "Two takes", "assigned_influencer_id": "none" }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["notes"], "Two takes");
    assert!(body["data"]["assigned_influencer"].is_null());
    assert_eq!(body["data"]["title"], "Summer reel");
    Ok(())
}

#[tokio::test]
async fn influencer_sees_only_assigned_collaborations() -> Result<()> {
    let Some(org) = common::seeded_org().await? else { return Ok(()) };
    let company_id = org.company("Acme Foods").await?;

    let mut ids = Vec::new();
    for (title, assigned) in [("Assigned", Some(org.influencer.profile_id)), ("Unassigned", None)] {
        let (status, body) = org
            .post(
                &org.admin,
                "/api/collaborations",
                json!({ "title": title, "company_id": company_id, "assigned_influencer_id": assigned }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let (status, body) = org.get(&org.influencer, "/api/collaborations").await?;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Assigned");

    let (status, _) = org.get(&org.influencer, &format!("/api/collaborations/{}", ids[1])).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = org
        .patch(&org.influencer, &format!("/api/collaborations/{}/status", ids[1]), json!({ "status": "completed" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = org.get(&org.brand, "/api/collaborations").await?;
    assert_eq!(body["data"]["pagination"]["total"], 2);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_rejects_unknown_sort() -> Result<()> {
    let Some(org) = common::seeded_org().await? else { return Ok(()) };
    let company_id = org.company("Acme Foods").await?;

    for (title, deadline, status) in [
        ("Late", "2000-01-01", "negotiating"),
        ("Late but done", "2000-01-01", "completed"),
        ("Future", "2099-01-01", "requested"),
    ] {
        let (code, body) = org
            .post(
                &org.admin,
                "/api/collaborations",
                json!({ "title": title, "company_id": company_id, "deadline": deadline, "status": status }),
            )
            .await?;
        assert_eq!(code, StatusCode::CREATED, "{}", body);
    }

    let (_, body) = org.get(&org.admin, "/api/collaborations?status=overdue").await?;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Late");
    assert_eq!(items[0]["is_overdue"], true);

    let (_, body) = org.get(&org.admin, "/api/collaborations?search=late&sort=title&order=asc").await?;
    let titles: Vec<_> = body["data"]["items"].as_array().unwrap().iter().map(|c| c["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Late"), json!("Late but done")]);

    let (_, body) = org.get(&org.admin, "/api/collaborations?limit=1&page=2").await?;
    assert_eq!(body["data"]["pagination"]["totalPages"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let (status, _) = org.get(&org.admin, "/api/collaborations?sort=organization_id").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = org.get(&org.admin, "/api/collaborations?status=archived").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn dashboard_buckets_open_collaborations() -> Result<()> {
    let Some(org) = common::seeded_org().await? else { return Ok(()) };
    let company_id = org.company("Acme Foods").await?;

    let soon = (chrono::Utc::now() + chrono::Duration::days(2)).format("%Y-%m-%d").to_string();
    for (title, deadline) in [("Overdue", "2000-01-01".to_string()), ("Soon", soon)] {
        let (code, _) = org
            .post(&org.admin, "/api/collaborations", json!({ "title": title, "company_id": company_id, "deadline": deadline }))
            .await?;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = org.get(&org.admin, "/api/dashboard").await?;
    assert_eq!(status, StatusCode::OK);
    let counts = &body["data"]["counts"];
    assert_eq!(counts["total"], 2);
    assert_eq!(counts["overdue"], 1);
    assert_eq!(counts["upcoming"], 1);
    assert_eq!(counts["by_status"]["requested"], 2);
    assert_eq!(body["data"]["upcoming"][0]["title"], "Soon");

    // Nothing is assigned to the influencer yet
    let (_, body) = org.get(&org.influencer, "/api/dashboard").await?;
    assert_eq!(body["data"]["counts"]["total"], 0);
    Ok(())
}

#[tokio::test]
async fn company_with_collaborations_cannot_be_deleted() -> Result<()> {
    let Some(org) = common::seeded_org().await? else { return Ok(()) };
    let company_id = org.company("Acme Foods").await?;

    let (_, body) = org
        .post(&org.admin, "/api/collaborations", json!({ "title": "Spring", "company_id": company_id }))
        .await?;
    let collaboration_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = org.delete(&org.admin, &format!("/api/companies/{}", company_id)).await?;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, _) = org.delete(&org.admin, &format!("/api/collaborations/{}", collaboration_id)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = org.delete(&org.admin, &format!("/api/companies/{}", company_id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);
    Ok(())
}

#[tokio::test]
async fn references_must_belong_to_the_same_organization() -> Result<()> {
    let Some(org) = common::seeded_org().await? else { return Ok(()) };
    let Some(other) = common::seeded_org().await? else { return Ok(()) };
    let own_company = org.company("Acme Foods").await?;
    let foreign_company = other.company("Elsewhere GmbH").await?;

    let (status, body) = org
        .post(&org.admin, "/api/collaborations", json!({ "title": "Borrowed brand", "company_id": foreign_company }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["field_errors"]["company_id"][0], "Company not found");

    let (status, body) = org
        .post(
            &org.admin,
            "/api/collaborations",
            json!({
                "title": "Borrowed influencer",
                "company_id": own_company,
                "assigned_influencer_id": other.influencer.profile_id
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["field_errors"]["assigned_influencer_id"][0], "Influencer not found");

    // Same organization, but not an influencer
    let (status, body) = org
        .post(
            &org.admin,
            "/api/collaborations",
            json!({ "title": "Brand as talent", "company_id": own_company, "assigned_influencer_id": org.brand.profile_id }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(body["field_errors"]["assigned_influencer_id"].is_array());

    // Moving an existing collaboration to a foreign company is refused too
    let (_, body) = org
        .post(&org.admin, "/api/collaborations", json!({ "title": "Home grown", "company_id": own_company }))
        .await?;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let (status, body) = org
        .put(&org.admin, &format!("/api/collaborations/{}", id), json!({ "company_id": foreign_company }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(body["field_errors"]["company_id"].is_array());

    let (_, body) = org.get(&org.admin, "/api/collaborations").await?;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    Ok(())
}
