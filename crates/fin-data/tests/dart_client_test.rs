//! DART OpenAPI 클라이언트 통합 테스트 (목 서버).

use fin_core::{FsDiv, ReportKind};
use fin_data::provider::{DartClient, DisclosureProvider};
use mockito::{Matcher, Server, ServerGuard};
use std::io::Write;

fn client(server: &ServerGuard) -> DartClient {
    DartClient::new("test-key")
        .unwrap()
        .with_base_url(server.url())
        .with_pdf_url(format!("{}/pdf/download/main.do", server.url()))
}

fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    buf.into_inner()
}

#[tokio::test]
async fn test_download_corp_codes() {
    let mut server = Server::new_async().await;
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <list><corp_code>00126380</corp_code><corp_name>삼성전자</corp_name><stock_code>005930</stock_code><modify_date>20240101</modify_date></list>
  <list><corp_code>01234567</corp_code><corp_name>비상장&amp;컴퍼니</corp_name><stock_code> </stock_code></list>
  <list><corp_code></corp_code><corp_name>코드없음</corp_name></list>
</result>"#;

    server
        .mock("GET", "/corpCode.xml")
        .match_query(Matcher::UrlEncoded("crtfc_key".into(), "test-key".into()))
        .with_body(zip_bytes(&[("CORPCODE.xml", xml)]))
        .create_async()
        .await;

    let companies = client(&server).download_corp_codes().await.unwrap();

    assert_eq!(companies.len(), 2);
    assert!(companies[0].is_listed());
    assert_eq!(companies[1].corp_name, "비상장&컴퍼니");
    assert_eq!(companies[1].stock_code, "N/A");
}

#[tokio::test]
async fn test_fetch_financial_statements_filters_fs_div() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/fnlttMultiAcnt.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("corp_code".into(), "00126380".into()),
            Matcher::UrlEncoded("bsns_year".into(), "2023".into()),
            Matcher::UrlEncoded("reprt_code".into(), "11011".into()),
        ]))
        .with_body(
            r#"{"status":"000","message":"정상","list":[
              {"corp_code":"00126380","bsns_year":"2023","fs_div":"CFS","sj_div":"BS","account_id":"ifrs-full_Assets","account_nm":"자산총계",
               "thstrm_dt":"2023.12.31 현재","thstrm_amount":"455,905,980,000,000","frmtrm_amount":"448,424,507,000,000","ord":"1","currency":"KRW"},
              {"corp_code":"00126380","bsns_year":"2023","fs_div":"OFS","sj_div":"BS","account_id":"ifrs-full_Assets","account_nm":"자산총계",
               "thstrm_amount":"1"}
            ]}"#,
        )
        .create_async()
        .await;

    let records = client(&server)
        .fetch_financial_statements("00126380", "2023", FsDiv::Consolidated)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fs_div, "CFS");
    assert_eq!(records[0].account_nm, "자산총계");
}

#[tokio::test]
async fn test_no_data_status_is_empty_not_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/fnlttMultiAcnt.json")
        .match_query(Matcher::Any)
        .with_body(r#"{"status":"013","message":"조회된 데이타가 없습니다."}"#)
        .create_async()
        .await;

    let records = client(&server)
        .fetch_financial_statements("00126380", "1999", FsDiv::Separate)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_search_report_documents_excludes_corrections_and_withdrawals() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/list.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("bgn_de".into(), "20240101".into()),
            Matcher::UrlEncoded("end_de".into(), "20241231".into()),
        ]))
        .with_body(
            r#"{"status":"000","list":[
              {"corp_code":"01234567","report_nm":"감사보고서 (2023.12)","rcept_no":"20240401000001","rcept_dt":"20240401"},
              {"corp_code":"01234567","report_nm":"[기재정정]감사보고서 (2023.12)","rcept_no":"20240501000001","rcept_dt":"20240501"},
              {"corp_code":"01234567","report_nm":"[철회]사업보고서 (2023.12)","rcept_no":"20240601000001","rcept_dt":"20240601"},
              {"corp_code":"01234567","report_nm":"주주총회소집공고","rcept_no":"20240301000001","rcept_dt":"20240301"}
            ]}"#,
        )
        .create_async()
        .await;

    let reports = client(&server)
        .search_report_documents("01234567", "2024")
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].rcept_no, "20240401000001");
    assert_eq!(reports[0].report_kind(), Some(ReportKind::Audit));
}

#[tokio::test]
async fn test_download_document_unzips_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/document.xml")
        .match_query(Matcher::UrlEncoded("rcept_no".into(), "20240401000001".into()))
        .with_body(zip_bytes(&[
            ("20240401000001_00760.txt", "첨부"),
            ("20240401000001.xml", "<html><table><tr><td>자산총계</td></tr></table></html>"),
        ]))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc").join("report.html");

    client(&server)
        .download_document("20240401000001", &path)
        .await
        .unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("자산총계"));
}

#[tokio::test]
async fn test_download_pdf_rejects_non_pdf() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/pdf/download/main.do")
        .match_query(Matcher::Any)
        .with_header("content-type", "text/html")
        .with_body("<html>로그인 필요</html>")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .download_document_pdf("20240401000001", &dir.path().join("report.bin"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("응답이 PDF가 아닙니다"));
}

#[tokio::test]
async fn test_upstream_error_preserves_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/list.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("점검 중")
        .create_async()
        .await;

    let err = client(&server)
        .list_disclosures("00126380", "2024")
        .await
        .unwrap_err();
    let fin_err: fin_core::FinError = err.into();

    assert!(matches!(fin_err, fin_core::FinError::DartApi(_)));
    assert!(fin_err.to_string().contains("점검 중"));
}
