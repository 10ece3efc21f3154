//! Page windows over the public FAQ listing.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test as actix_test;
use rstest::rstest;

use carematch::domain::{Faq, FaqId};
use carematch::test_support::InMemoryApp;
use support::{api, call};

const FAQ_COUNT: usize = 7;

fn app_with_faqs() -> InMemoryApp {
    InMemoryApp::with_faqs(
        (0..FAQ_COUNT)
            .map(|index| Faq {
                id: FaqId::random(),
                pregunta: format!("Pregunta {index}"),
                respuesta: format!("Respuesta {index}"),
            })
            .collect(),
    )
}

#[rstest]
#[case(1, 3)]
#[case(2, 3)]
#[case(3, 3)]
#[case(4, 3)]
#[case(1, 10)]
#[case(2, 1)]
#[actix_web::test]
async fn pages_skip_earlier_windows(#[case] page: usize, #[case] limit: usize) {
    let app = app_with_faqs();
    let service = actix_test::init_service(api(&app)).await;

    let reply = call(
        &service,
        Method::GET,
        &format!("/support/faq?page={page}&limit={limit}"),
        None,
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["total"], FAQ_COUNT);
    assert_eq!(reply.body["page"], page);
    assert_eq!(reply.body["limit"], limit);

    let skip = (page - 1) * limit;
    let expected: Vec<String> = (skip..FAQ_COUNT.min(skip + limit))
        .map(|index| format!("Pregunta {index}"))
        .collect();
    let served: Vec<&str> = reply.body["faqs"]
        .as_array()
        .expect("faqs")
        .iter()
        .filter_map(|faq| faq["pregunta"].as_str())
        .collect();
    assert_eq!(served, expected);
}

#[rstest]
#[case("page=0&limit=0", 1, 10)]
#[case("page=-2", 1, 10)]
#[case("", 1, 10)]
#[actix_web::test]
async fn out_of_range_windows_are_clamped(#[case] query: &str, #[case] page: u64, #[case] limit: u64) {
    let app = app_with_faqs();
    let service = actix_test::init_service(api(&app)).await;

    let reply = call(&service, Method::GET, &format!("/support/faq?{query}"), None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["page"], page);
    assert_eq!(reply.body["limit"], limit);
}
