//! End-to-end crawl and export over scripted pages
use std::sync::Arc;

use storefront_crawler::application::{CrawlError, ExportService, PaginationController};
use storefront_crawler::domain::CrawlPhase;
use storefront_crawler::infrastructure::renderer::RendererError;
use storefront_crawler::infrastructure::{AppConfig, PageLoader, PageLoaderConfig, ProductListParser};
use storefront_crawler::test_utils::{
    PageScript, RecordingReporter, ReportEvent, ScriptedRenderer, listing_page,
};

const SHOP: &str = "https://www.tokopedia.com/tokoserbaada/product";

fn controller(
    config: &AppConfig,
    renderer: ScriptedRenderer,
    reporter: &RecordingReporter,
) -> PaginationController<ScriptedRenderer> {
    PaginationController::new(
        renderer,
        PageLoader::new(PageLoaderConfig::from(config).without_pauses()),
        ProductListParser::from_config(&config.parsing_config()).unwrap(),
        Arc::new(reporter.clone()),
    )
}

fn two_page_shop() -> ScriptedRenderer {
    ScriptedRenderer::new()
        .with_page(
            SHOP,
            PageScript::new(listing_page(&[
                ("Susu UHT 250ML Coklat", "Rp5.500", "150+ terjual"),
                ("Kopi Bubuk (Pack of 3)", "Rp45.000", "20 terjual"),
            ]))
            .with_heights(&[2000, 4000, 4000])
            .with_next("/tokoserbaada/product/page/2"),
        )
        .with_page(
            "https://www.tokopedia.com/tokoserbaada/product/page/2",
            PageScript::new(listing_page(&[
                ("Gula Pasir 1KG", "Rp16.000", "1rb terjual"),
                ("Teh Celup 25 Sachet", "N/A", "300+ terjual"),
                ("Minyak Goreng 2L", "Rp38.900", "150 terjual"),
            ])),
        )
}

#[tokio::test]
async fn crawl_then_export_writes_sorted_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.export.output_path = dir.path().join("products.csv");

    let reporter = RecordingReporter::new();
    let renderer = two_page_shop();
    let log = renderer.log();

    let outcome = controller(&config, renderer, &reporter).run(SHOP, None).await.unwrap();
    assert_eq!(outcome.final_phase, CrawlPhase::Done);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 5);
    assert_eq!(log.close_calls(), 1);
    assert_eq!(
        log.navigations()[1],
        "https://www.tokopedia.com/tokoserbaada/product/page/2"
    );

    let summary = ExportService::from_config(&config, Arc::new(reporter.clone()))
        .export(&outcome.records)
        .unwrap()
        .unwrap();
    assert_eq!(summary.rows_written, 4);
    assert_eq!(summary.rows_skipped, 1);

    let mut reader = csv::Reader::from_path(&config.export.output_path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["Product Name", "Unit", "Price", "Sales"]);

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["Susu UHT Coklat", "250ML", "5500.0", "150"],
            vec!["Minyak Goreng 2L", "", "38900.0", "150"],
            vec!["Kopi Bubuk", "Pack of 3", "45000.0", "20"],
            vec!["Gula Pasir", "1KG", "16000.0", "0"],
        ]
    );

    assert!(matches!(
        reporter.events().last(),
        Some(ReportEvent::ExportCompleted(_))
    ));
}

#[tokio::test]
async fn failure_mid_crawl_keeps_partial_records_with_the_error() {
    let config = AppConfig::default();
    let reporter = RecordingReporter::new();
    let renderer = ScriptedRenderer::new().with_page(
        SHOP,
        PageScript::new(listing_page(&[("Sabun Mandi 100GR", "Rp3.500", "9 terjual")]))
            .with_next("/tokoserbaada/product/page/2"),
    );
    let log = renderer.log();

    let err = controller(&config, renderer, &reporter).run(SHOP, None).await.unwrap_err();

    let CrawlError::PageFailed { page, source, .. } = &err;
    assert_eq!(*page, 2);
    assert!(matches!(source, RendererError::Navigation { .. }));
    assert_eq!(err.partial_records().len(), 1);
    assert!(log.is_closed());
}

#[tokio::test]
async fn empty_shop_exports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.export.output_path = dir.path().join("products.csv");

    let reporter = RecordingReporter::new();
    let renderer = ScriptedRenderer::new().with_page(SHOP, PageScript::new(listing_page(&[])));

    let outcome = controller(&config, renderer, &reporter).run(SHOP, Some(3)).await.unwrap();
    assert!(outcome.records.is_empty());

    let summary = ExportService::from_config(&config, Arc::new(reporter.clone()))
        .export(&outcome.records)
        .unwrap();
    assert!(summary.is_none());
    assert!(!config.export.output_path.exists());
    assert!(reporter.events().contains(&ReportEvent::NothingToExport));
}

#[test]
fn scripted_renderer_is_usable_outside_an_async_test() {
    use storefront_crawler::infrastructure::renderer::PageRenderer;

    let mut renderer = ScriptedRenderer::new().with_page(SHOP, PageScript::new("<html></html>"));
    tokio_test::block_on(async {
        renderer.navigate(SHOP).await.unwrap();
        assert_eq!(renderer.page_source().await.unwrap(), "<html></html>");
        renderer.close().await.unwrap();
        assert_eq!(renderer.page_source().await, Err(RendererError::Closed));
    });
}
