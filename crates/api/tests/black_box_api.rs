use reqwest::StatusCode;
use serde_json::{json, Value};

use trailhead_api::app::{build_app, AppConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(AppConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_minutes: 10,
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn signup(client: &reqwest::Client, srv: &TestServer, email: &str) -> String {
    let res = client
        .post(srv.url("/api/v1/users/signup"))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "pass1234",
            "passwordConfirm": "pass1234",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

fn tour_body(name: &str, duration: u32, price: f64, ratings_average: f64) -> Value {
    json!({
        "name": name,
        "duration": duration,
        "maxGroupSize": 25,
        "difficulty": "medium",
        "price": price,
        "ratingsAverage": ratings_average,
        "summary": "A walk in the hills",
        "imageCover": "cover.jpg",
    })
}

async fn create_tour(client: &reqwest::Client, srv: &TestServer, body: Value) -> Value {
    let res = client
        .post(srv.url("/api/v1/tours"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["data"]["tour"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_routes_use_the_failure_envelope() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/api/v1/nope")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Can't find /api/v1/nope on this server");
}

#[tokio::test]
async fn listing_tours_requires_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/v1/tours")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "You are not logged in. Please log in to get access."
    );

    let res = client
        .get(srv.url("/api/v1/tours"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token. Please log in again.");
}

#[tokio::test]
async fn signup_and_login_issue_usable_tokens() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/v1/users/signup"))
        .json(&json!({
            "name": "Ayls",
            "email": "Ayls@Example.COM",
            "password": "pass1234",
            "passwordConfirm": "pass1234",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    let token = body["token"].as_str().unwrap().to_string();
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "ayls@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("passwordHash").is_none());

    // The signup token works on a protected route.
    let res = client
        .get(srv.url("/api/v1/tours"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Login with the same credentials (any casing of the email).
    let res = client
        .post(srv.url("/api/v1/users/login"))
        .json(&json!({"email": "AYLS@example.com", "password": "pass1234"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body["token"].as_str().is_some());

    // Wrong password and unknown email report the same message.
    let res = client
        .post(srv.url("/api/v1/users/login"))
        .json(&json!({"email": "ayls@example.com", "password": "wrong999"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Incorrect email or password");

    // Missing credentials are a 400, not a deserialization error.
    let res = client
        .post(srv.url("/api/v1/users/login"))
        .json(&json!({"email": "ayls@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Please provide email and password");
}

#[tokio::test]
async fn signing_up_an_existing_email_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    signup(&client, &srv, "taken@example.com").await;

    let res = client
        .post(srv.url("/api/v1/users/signup"))
        .json(&json!({
            "name": "Second Comer",
            "email": "taken@example.com",
            "password": "pass1234",
            "passwordConfirm": "pass1234",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Email address already in use");
}

#[tokio::test]
async fn malformed_json_bodies_use_the_failure_envelope() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/v1/users/login"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not valid json")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn tour_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let tour = create_tour(&client, &srv, tour_body("The Forest Hiker", 5, 397.0, 4.7)).await;
    let id = tour["id"].as_str().unwrap().to_string();
    assert_eq!(tour["slug"], "the-forest-hiker");
    assert_eq!(tour["ratingsQuantity"], 0);

    // Duplicate names are rejected.
    let res = client
        .post(srv.url("/api/v1/tours"))
        .json(&tour_body("The Forest Hiker", 7, 200.0, 4.0))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .get(srv.url(&format!("/api/v1/tours/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["tour"]["name"], "The Forest Hiker");

    let res = client
        .patch(srv.url(&format!("/api/v1/tours/{id}")))
        .json(&json!({"price": 497.0}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["tour"]["price"], 497.0);

    // An update that breaks validation reports the schema message.
    let res = client
        .patch(srv.url(&format!("/api/v1/tours/{id}")))
        .json(&json!({"ratingsAverage": 9.0}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Rating must be below 5.0");

    let res = client
        .delete(srv.url(&format!("/api/v1/tours/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(srv.url(&format!("/api/v1/tours/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "No tour found with that ID");

    let res = client
        .get(srv.url("/api/v1/tours/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_supports_filter_sort_fields_and_pagination() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = signup(&client, &srv, "query@example.com").await;

    create_tour(&client, &srv, tour_body("Short Stroll", 3, 150.0, 4.2)).await;
    create_tour(&client, &srv, tour_body("Forest Week", 7, 400.0, 4.8)).await;
    create_tour(&client, &srv, tour_body("Mountain Fortnight", 14, 900.0, 4.9)).await;
    create_tour(&client, &srv, tour_body("Desert Trek", 10, 600.0, 4.6)).await;

    // duration[gte]=7 filters, sort=price orders ascending, fields projects.
    let res = client
        .get(srv.url(
            "/api/v1/tours?duration[gte]=7&sort=price&fields=name,price",
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"], 3);
    let tours = body["data"]["tours"].as_array().unwrap();
    let names: Vec<&str> = tours.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Forest Week", "Desert Trek", "Mountain Fortnight"]);
    for tour in tours {
        let keys: Vec<&String> = tour.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|k| ["id", "name", "price"].contains(&k.as_str())));
        assert!(tour.get("id").is_some());
    }

    // The stamped version counter stays hidden unless asked for.
    let res = client
        .get(srv.url("/api/v1/tours?sort=price"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    for tour in body["data"]["tours"].as_array().unwrap() {
        assert!(tour.get("version").is_none());
    }

    // Pagination: page 2 of size 2 under sort=price.
    let res = client
        .get(srv.url("/api/v1/tours?sort=price&limit=2&page=2"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"], 2);
    let names: Vec<&str> = body["data"]["tours"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Desert Trek", "Mountain Fortnight"]);

    // A page past the data is an empty success, not an error.
    let res = client
        .get(srv.url("/api/v1/tours?limit=10&page=5"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"], 0);
    assert_eq!(body["data"]["tours"], json!([]));

    // Even a page number at the numeric limit stays an empty success.
    let res = client
        .get(srv.url("/api/v1/tours?page=18446744073709551615&limit=100"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"], 0);
}

#[tokio::test]
async fn top_five_cheap_alias_presets_the_query() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (i, rating) in [4.9, 4.9, 4.7, 4.7, 4.5, 4.3, 4.1].iter().enumerate() {
        create_tour(
            &client,
            &srv,
            tour_body(&format!("Alias Tour {i}"), 5, 100.0 + i as f64 * 50.0, *rating),
        )
        .await;
    }

    let res = client
        .get(srv.url("/api/v1/tours/top-5-cheap"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"], 5);

    let tours = body["data"]["tours"].as_array().unwrap();
    // Best rated first; price breaks rating ties ascending.
    let pairs: Vec<(f64, f64)> = tours
        .iter()
        .map(|t| (t["ratingsAverage"].as_f64().unwrap(), t["price"].as_f64().unwrap()))
        .collect();
    for window in pairs.windows(2) {
        let (r0, p0) = window[0];
        let (r1, p1) = window[1];
        assert!(r0 > r1 || (r0 == r1 && p0 <= p1));
    }
    for tour in tours {
        let keys: Vec<&String> = tour.as_object().unwrap().keys().collect();
        assert!(keys.iter().all(|k| {
            ["id", "name", "price", "ratingsAverage", "summary", "difficulty"]
                .contains(&k.as_str())
        }));
    }
}

#[tokio::test]
async fn tour_stats_group_highly_rated_tours_by_difficulty() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut easy = tour_body("Easy One Tour", 4, 200.0, 4.8);
    easy["difficulty"] = json!("easy");
    create_tour(&client, &srv, easy).await;

    let mut easy2 = tour_body("Easy Two Tour", 4, 400.0, 4.6);
    easy2["difficulty"] = json!("easy");
    create_tour(&client, &srv, easy2).await;

    let mut hard = tour_body("Hard One Tour", 10, 100.0, 4.9);
    hard["difficulty"] = json!("difficult");
    create_tour(&client, &srv, hard).await;

    // Below the 4.5 rating floor; excluded from the stats.
    create_tour(&client, &srv, tour_body("Meh Tour Name", 5, 50.0, 3.0)).await;

    let res = client.get(srv.url("/api/v1/tours/stats")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let stats = body["data"]["stats"].as_array().unwrap();
    assert_eq!(stats.len(), 2);

    // Sorted by average price ascending: DIFFICULT (100) before EASY (300).
    assert_eq!(stats[0]["difficulty"], "DIFFICULT");
    assert_eq!(stats[0]["numTours"], 1);
    assert_eq!(stats[0]["avgPrice"], 100.0);

    assert_eq!(stats[1]["difficulty"], "EASY");
    assert_eq!(stats[1]["numTours"], 2);
    assert_eq!(stats[1]["avgPrice"], 300.0);
    assert_eq!(stats[1]["minPrice"], 200.0);
    assert_eq!(stats[1]["maxPrice"], 400.0);
}

#[tokio::test]
async fn reviews_are_authored_by_authenticated_users() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let tour = create_tour(&client, &srv, tour_body("Reviewed Tour", 5, 300.0, 4.5)).await;
    let tour_id = tour["id"].as_str().unwrap();

    // No token: 401.
    let res = client
        .post(srv.url("/api/v1/reviews"))
        .json(&json!({"review": "Great!", "rating": 5.0, "tour": tour_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = signup(&client, &srv, "reviewer@example.com").await;

    let res = client
        .post(srv.url("/api/v1/reviews"))
        .bearer_auth(&token)
        .json(&json!({"review": "Great!", "rating": 4.0, "tour": tour_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["review"]["rating"], 4.0);
    assert_eq!(body["data"]["review"]["tour"], tour_id);
    assert!(body["data"]["review"]["user"].as_str().is_some());

    // A review against a missing tour is a 404.
    let res = client
        .post(srv.url("/api/v1/reviews"))
        .bearer_auth(&token)
        .json(&json!({
            "review": "Ghost",
            "rating": 3.0,
            "tour": "00000000-0000-7000-8000-000000000000",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "No tour found with that ID");

    // Listing reviews is public.
    let res = client.get(srv.url("/api/v1/reviews")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["results"], 1);
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = signup(&client, &srv, "plain@example.com").await;

    let res = client
        .get(srv.url("/api/v1/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "You do not have permission to perform this action"
    );
}
