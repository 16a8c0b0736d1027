//! Protocol tests for the ZTE 8810FT driver against a mocked device.

use chrono::{FixedOffset, TimeZone};
use modem_drivers::{
    Action, ActionError, BaseModem, CodecError, DriverRegistry, Error, LinkStatus,
    ModemConfig, SmsMessage,
};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SET_PATH: &str = "/goform/goform_set_cmd_process";
const GET_PATH: &str = "/goform/goform_get_cmd_process";

fn modem_for(server: &MockServer) -> Box<dyn BaseModem> {
    let mut config = ModemConfig::new(server.address().to_string());
    config.timeout = Duration::from_secs(5);
    DriverRegistry::with_builtin()
        .resolve("ZTE 8810FT", config)
        .expect("driver should build against the mock device")
}

fn referer_for(server: &MockServer) -> String {
    format!("http://{}/index.html", server.address())
}

fn json_200(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_owned(), "application/json")
}

#[tokio::test]
async fn status_decodes_connected_as_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GET_PATH))
        .and(query_param("cmd", "ppp_status"))
        .and(query_param("isTest", "False"))
        .and(query_param("multi_data", "1"))
        .and(header("Referer", referer_for(&server).as_str()))
        .respond_with(json_200(r#"{"ppp_status":"ppp_connected"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let status = modem.cell().unwrap().cell_link_status().await.unwrap();
    assert_eq!(status, LinkStatus::Up);
}

#[tokio::test]
async fn status_rejects_unrecognized_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GET_PATH))
        .and(query_param("cmd", "ppp_status"))
        .respond_with(json_200(r#"{"ppp_status":"bogus"}"#))
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let err = modem.cell().unwrap().cell_link_status().await.unwrap_err();
    match err {
        Error::Action {
            action: Action::Status,
            source: ActionError::UnknownLinkStatus(token),
        } => assert_eq!(token, "bogus"),
        other => panic!("expected unknown link status, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_issues_the_goform_command() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SET_PATH))
        .and(query_param("goformId", "CONNECT_NETWORK"))
        .and(header("Referer", referer_for(&server).as_str()))
        .respond_with(json_200(r#"{"result":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    modem.cell().unwrap().connect_cell().await.unwrap();
}

#[tokio::test]
async fn disconnect_issues_the_goform_command() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SET_PATH))
        .and(query_param("goformId", "DISCONNECT_NETWORK"))
        .respond_with(json_200(r#"{"result":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    modem.cell().unwrap().disconnect_cell().await.unwrap();
}

#[tokio::test]
async fn non_200_surfaces_without_a_json_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SET_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let err = modem.cell().unwrap().connect_cell().await.unwrap_err();
    match err {
        Error::Action {
            action: Action::Connect,
            source: ActionError::Status(code),
        } => assert_eq!(code.as_u16(), 500),
        other => panic!("expected a status failure, got {other:?}"),
    }
}

#[tokio::test]
async fn device_refusal_is_an_action_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SET_PATH))
        .respond_with(json_200(r#"{"result":"failure"}"#))
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let err = modem.cell().unwrap().connect_cell().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Action {
            action: Action::Connect,
            source: ActionError::Failed(verdict),
        } if verdict == "failure"
    ));
}

#[tokio::test]
async fn malformed_bodies_keep_the_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GET_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>not json</html>"),
        )
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let err = modem.cell().unwrap().cell_link_status().await.unwrap_err();
    match err {
        Error::Action {
            action: Action::Status,
            source: ActionError::Unmarshal { raw, .. },
        } => assert_eq!(raw, b"<html>not json</html>"),
        other => panic!("expected an unmarshal failure, got {other:?}"),
    }
}

#[tokio::test]
async fn send_sms_posts_the_vendor_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SET_PATH))
        .and(header(
            "Content-Type",
            "application/x-www-form-urlencoded; charset=UTF-8",
        ))
        .and(header("Referer", referer_for(&server).as_str()))
        .and(body_string_contains("goformId=SEND_SMS"))
        .and(body_string_contains("ID=-1"))
        .and(body_string_contains("encode_type=GSM7_default"))
        // E.164 plus sign must arrive percent-encoded.
        .and(body_string_contains("Number=%2B15551234567"))
        // "test" as 7-bit units in the device's 00XX framing, uppercase hex.
        .and(body_string_contains("MessageBody=0074006500730074"))
        .and(body_string_contains("sms_time="))
        .respond_with(json_200(r#"{"result":"success"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    modem
        .sms()
        .unwrap()
        .send_sms("+15551234567", "test")
        .await
        .unwrap();
}

#[tokio::test]
async fn unencodable_text_fails_before_any_request() {
    // No mocks mounted: reaching the server would fail the envelope check,
    // so a passing test proves the codec rejected the text first.
    let server = MockServer::start().await;
    let modem = modem_for(&server);

    let err = modem
        .sms()
        .unwrap()
        .send_sms("+15551234567", "Привет")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Action {
            action: Action::SmsSend,
            source: ActionError::Codec(CodecError::NotGsm7('П')),
        }
    ));
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn read_all_sms_decodes_the_listing_in_device_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GET_PATH))
        .and(query_param("cmd", "sms_data_total"))
        .and(query_param("page", "0"))
        .and(query_param("data_per_page", "100"))
        .and(query_param("mem_store", "1"))
        .and(query_param("tags", "12"))
        .and(query_param("order_by", "order by id desc"))
        .respond_with(json_200(
            r#"[
                {"id":"2","number":"+15551234567","content":"00480069","tag":"1","date":"24,08,06,14,30,05,+3"},
                {"id":"1","number":"+15557654321","content":"004F006B","tag":"0","date":"23,12,31,23,59,59,-5"}
            ]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let messages = modem.sms().unwrap().read_all_sms().await.unwrap();

    assert_eq!(
        messages,
        vec![
            SmsMessage {
                id: "2".to_owned(),
                time: FixedOffset::east_opt(3 * 3600)
                    .unwrap()
                    .with_ymd_and_hms(2024, 8, 6, 14, 30, 5)
                    .unwrap(),
                sender: "+15551234567".to_owned(),
                body: "Hi".to_owned(),
            },
            SmsMessage {
                id: "1".to_owned(),
                time: FixedOffset::west_opt(5 * 3600)
                    .unwrap()
                    .with_ymd_and_hms(2023, 12, 31, 23, 59, 59)
                    .unwrap(),
                sender: "+15557654321".to_owned(),
                body: "Ok".to_owned(),
            },
        ]
    );
}

#[tokio::test]
async fn a_malformed_record_fails_the_batch_with_its_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GET_PATH))
        .and(query_param("cmd", "sms_data_total"))
        .respond_with(json_200(
            r#"[
                {"id":"9","number":"+15551234567","content":"00480069","tag":"1","date":"24,08,06,14,30,05,+3"},
                {"id":"7","number":"+15557654321","content":"00ZZ","tag":"0","date":"24,08,06,15,00,00,+3"}
            ]"#,
        ))
        .mount(&server)
        .await;

    let modem = modem_for(&server);
    let err = modem.sms().unwrap().read_all_sms().await.unwrap_err();
    match err {
        Error::Action {
            action: Action::SmsRead,
            source: ActionError::Record { id, .. },
        } => assert_eq!(id, "7"),
        other => panic!("expected a record failure, got {other:?}"),
    }
}

#[tokio::test]
async fn resolving_an_unknown_model_never_touches_the_network() {
    let err = DriverRegistry::with_builtin()
        .resolve("unknown-model", ModemConfig::new("192.0.2.1"))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownModel(name) if name == "unknown-model"));
}
