//! End-to-end ingestion and export tests over the public API.

use cardex::{
    Error, ExportFormat, ExportOptions, ExportService, IngestFormat, IngestService, RawCard,
    Submission, min_date_of_birth,
};
use chrono::NaiveDate;

fn service() -> IngestService {
    IngestService::new()
}

fn xml_submission(payload: &str) -> Submission {
    Submission {
        xml_payload: Some(payload.to_string()),
        ..Default::default()
    }
}

fn csv_submission(payload: &str) -> Submission {
    Submission {
        csv_payload: Some(payload.to_string()),
        ..Default::default()
    }
}

#[test]
fn qr_payload_yields_one_canonical_card() {
    let submission = Submission {
        qr_payload: Some(
            r#"{"Name":"Jane Doe","Gender":"Female","Email":"jane@example.com","Phone":"555","Address":"1 Oak St","PhotoBase64":"SGVsbG8="}"#
                .to_string(),
        ),
        ..Default::default()
    };

    let outcome = service().ingest(&submission).unwrap();
    assert_eq!(outcome.format, IngestFormat::Qr);
    assert_eq!(outcome.cards.len(), 1);

    let card = &outcome.cards[0];
    assert_eq!(card.name, "Jane Doe");
    assert_eq!(card.gender, "Female");
    assert_eq!(card.email, "jane@example.com");
    assert_eq!(card.phone.as_deref(), Some("555"));
    assert_eq!(card.address, "1 Oak St");
    // "SGVsbG8=" is base64 for "Hello".
    assert_eq!(card.photo, "SGVsbG8=");
    assert_eq!(card.date_of_birth, min_date_of_birth());
}

#[test]
fn direct_submission_strips_photo_prefix() {
    let submission = Submission {
        fields: RawCard {
            name: Some("Jane Doe".to_string()),
            photo: Some("data:image/png,QUJD".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let outcome = service().ingest(&submission).unwrap();
    assert_eq!(outcome.cards.len(), 1);
    assert_eq!(outcome.cards[0].photo, "QUJD"); // 3 decoded bytes
}

#[test]
fn xml_without_root_collection_is_a_single_top_level_failure() {
    let outcome = service().ingest(&xml_submission("<Unrelated><Thing/></Unrelated>"));
    match outcome {
        Err(Error::Parse { format, .. }) => assert_eq!(format, IngestFormat::Xml),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn csv_line_with_wrong_column_count_fails_alone() {
    let payload = "Name,Gender,DateOfBirth,Email,Phone,PhotoBase64,Address\n\
                   A,F,1990-01-01,a@x.com,1,,Addr\n\
                   B,M,1991-01-01,b@x.com,2,,Addr\n\
                   C,F,1992-01-01\n\
                   D,M,1993-01-01,d@x.com,4,,Addr\n\
                   E,F,1994-01-01,e@x.com,5,,Addr\n";

    let outcome = service().ingest(&csv_submission(payload)).unwrap();
    assert_eq!(outcome.cards.len(), 4);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].record, 3);
}

#[test]
fn csv_export_then_ingest_reconstructs_cards() {
    let payload = "Name,Gender,DateOfBirth,Email,Phone,PhotoBase64,Address\n\
                   Jane Doe,Female,1990-05-04,jane@example.com,555-0100,SGVsbG8=,\"1 Oak St, Springfield\"\n\
                   John Roe,Male,1985-01-02,john@example.com,,,2 Elm St\n";

    let first_pass = service().ingest(&csv_submission(payload)).unwrap();
    assert_eq!(first_pass.cards.len(), 2);

    // Identifiers are store-assigned; exporting without them keeps the
    // text in the seven-column ingestion schema.
    let options = ExportOptions::default()
        .with_format(ExportFormat::Csv)
        .with_include_id(false);
    let exported = ExportService::new()
        .export_to_string(&first_pass.cards, &options)
        .unwrap();

    let second_pass = service().ingest(&csv_submission(&exported)).unwrap();
    assert!(second_pass.failures.is_empty());
    assert_eq!(second_pass.cards, first_pass.cards);
}

#[test]
fn xml_export_then_ingest_reconstructs_cards() {
    let payload = "<BusinessCards>\
                   <BusinessCard><Name>Jane Doe</Name><Gender>Female</Gender>\
                   <DateOfBirth>1990-05-04</DateOfBirth><Email>jane@example.com</Email>\
                   <Phone>555-0100</Phone><PhotoBase64>SGVsbG8=</PhotoBase64>\
                   <Address>1 Oak St</Address></BusinessCard>\
                   </BusinessCards>";

    let first_pass = service().ingest(&xml_submission(payload)).unwrap();
    assert_eq!(first_pass.cards.len(), 1);

    let exported = ExportService::new()
        .export_to_string(&first_pass.cards, &ExportOptions::default())
        .unwrap();

    // The exporter's Id element is ignored on ingest.
    let second_pass = service().ingest(&xml_submission(&exported)).unwrap();
    assert_eq!(second_pass.cards, first_pass.cards);
}

#[test]
fn xml_ingestion_is_all_or_nothing_on_bad_dates() {
    let payload = "<BusinessCards>\
                   <BusinessCard><Name>A</Name><DateOfBirth>1990-05-04</DateOfBirth></BusinessCard>\
                   <BusinessCard><Name>B</Name><DateOfBirth>bogus</DateOfBirth></BusinessCard>\
                   </BusinessCards>";

    assert!(service().ingest(&xml_submission(payload)).is_err());
}

#[test]
fn ingested_dates_round_trip_through_both_exporters() {
    let payload = "header\nJane,F,1990-05-04,j@x.com,,,Addr\n";
    let cards = service().ingest(&csv_submission(payload)).unwrap().cards;
    assert_eq!(
        cards[0].date_of_birth,
        NaiveDate::from_ymd_opt(1990, 5, 4).unwrap()
    );

    for format in [ExportFormat::Xml, ExportFormat::Csv] {
        let options = ExportOptions::default()
            .with_format(format)
            .with_include_id(false);
        let text = ExportService::new()
            .export_to_string(&cards, &options)
            .unwrap();
        assert!(text.contains("1990-05-04"), "{format} export lost the date");
    }
}
