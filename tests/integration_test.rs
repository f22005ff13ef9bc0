use anyhow::Result;
use std::env;
use std::fs;
use std::time::{Duration, Instant};
use vtable::{
    fetch_blocking, plan_window, Completion, ListView, MemorySource, PageRequest, PageSource,
    ViewportState, VtableConfig, WindowCalculator, WindowDecision,
};

#[test]
fn test_documented_window_example() -> Result<()> {
    let state = ViewportState::new(1000, 40.0, 800.0, 8000.0, 4);
    let plan = plan_window(&state, 1)?;

    assert_eq!(plan.rows_per_page, 20);
    assert_eq!(plan.first_page, 10);
    assert_eq!(plan.page_count, 4);
    assert_eq!(plan.top_padding_px, 7200.0);
    assert_eq!(plan.bottom_padding_px, 28800.0);

    let request = plan.to_request();
    assert_eq!(
        serde_json::to_value(request)?,
        serde_json::json!({"page": 10, "pages_to_bring": 4, "rowsperpage": 20})
    );
    Ok(())
}

#[test]
fn test_short_list_returns_one_page_of_rows() -> Result<()> {
    let state = ViewportState::new(5, 40.0, 800.0, 0.0, 4);
    let plan = plan_window(&state, 1)?;

    assert_eq!(plan.first_page, 1);
    assert_eq!(plan.page_count, 4);
    assert_eq!(plan.top_padding_px, 0.0);
    assert_eq!(plan.bottom_padding_px, 0.0);

    // The source stops at the end of the list, so one page of data comes back
    let source = MemorySource::new((0..5u32).collect());
    let response = source.fetch(&plan.to_request())?;
    assert_eq!(response.rows.len(), 5);
    assert_eq!(response.meta.total_pages, 1);
    Ok(())
}

#[test]
fn test_calculator_fetches_only_when_window_moves() -> Result<()> {
    let mut calc = WindowCalculator::new(&VtableConfig::default());
    let mut fetches = 0;

    // Scroll one pixel at a time through the first five pages
    for scroll in 0..(5 * 20 * 40) {
        let state = calc.state(1000, 40.0, 800.0, f64::from(scroll));
        if calc.compute(&state)?.needs_fetch() {
            fetches += 1;
        }
    }

    // The window stays on page 1 while pages 1 and 2 are under the scroll
    // position, then moves once each for pages 3, 4 and 5
    assert_eq!(fetches, 4);
    Ok(())
}

#[test]
fn test_list_view_session_against_memory_source() -> Result<()> {
    let source = MemorySource::synthetic(5_000);
    let mut view = ListView::new(&VtableConfig::default(), 25.0, 500.0);

    let order = view.mount()?;
    fetch_blocking(&mut view, &source, order)?;
    assert_eq!(view.total_rows(), 5_000);

    let start = Instant::now();
    let target = 25.0 * 2_500.0;
    view.scrolled(target, start);
    let order = view
        .poll(start + Duration::from_millis(300))?
        .expect("window moved");
    assert_eq!(fetch_blocking(&mut view, &source, order)?, Completion::Applied { follow_up: None });

    // The row under the scroll position is part of the rendered window
    let window = view.rendered().expect("rows rendered");
    let visible = 2_500u64;
    assert!(window.first_row <= visible);
    assert!(visible < window.first_row + window.rows.len() as u64);
    let (_, row) = window.rows_in(visible..visible + 1).next().expect("visible row");
    assert_eq!(row["id"], visible + 1);

    // Spacers plus fetched rows never exceed the full scroll height
    let rendered_height = window.rows.len() as f64 * view.row_height_px();
    assert!(view.top_padding_px() + rendered_height + view.bottom_padding_px() <= view.scroll_height_px());
    Ok(())
}

#[test]
fn test_shrinking_list_triggers_follow_up() -> Result<()> {
    let mut view = ListView::new(&VtableConfig::default(), 40.0, 800.0);
    let big = MemorySource::new((0..1000u64).collect());
    let order = view.mount()?;
    fetch_blocking(&mut view, &big, order)?;

    let start = Instant::now();
    view.scrolled(30_000.0, start);
    let order = view.poll(start + Duration::from_millis(300))?.expect("window moved");

    // The server lost rows while the request was in flight
    let small = MemorySource::new((0..200u64).collect());
    let completion = fetch_blocking(&mut view, &small, order)?;
    assert_eq!(completion, Completion::Applied { follow_up: None });
    assert_eq!(view.total_rows(), 200);

    let window = view.rendered().expect("rows rendered");
    assert_eq!(window.plan.first_page, 10);
    assert_eq!(window.plan.page_range(), 10..=13);
    assert_eq!(window.first_row, 180);
    assert_eq!(window.rows.len(), 20);
    assert_eq!(view.bottom_padding_px(), 0.0);
    Ok(())
}

#[test]
fn test_degenerate_viewport_is_empty() -> Result<()> {
    let mut calc = WindowCalculator::default();
    let state = calc.state(1000, 40.0, 0.0, 0.0);
    assert!(matches!(calc.compute(&state)?, WindowDecision::Empty(_)));
    assert_eq!(calc.last_window(), None);
    Ok(())
}

#[test]
fn test_config_file_drives_page_size() -> Result<()> {
    let path = env::temp_dir().join("vtable_integration_config.json");
    fs::write(&path, r#"{"rows_per_page_multiplier": 2, "cache_radius_pages": 3}"#)?;

    let config = VtableConfig::load(&path)?;
    let mut view: ListView<u64> = ListView::new(&config, 40.0, 800.0);
    let order = view.mount()?;
    assert_eq!(order.request, PageRequest::initial(40));

    let source = MemorySource::new((0..1000u64).collect());
    fetch_blocking(&mut view, &source, order)?;
    let window = view.rendered().expect("rows rendered");
    assert_eq!(window.plan.page_count, 3);
    assert_eq!(window.rows.len(), 120);

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn test_dataset_file_round_trip() -> Result<()> {
    let path = env::temp_dir().join("vtable_integration_rows.json");
    let source = MemorySource::synthetic_with_seed(300, 7);
    source.write_json_file(&path)?;

    let loaded = MemorySource::from_json_file(&path)?;
    assert_eq!(loaded.len(), 300);
    let response = loaded.fetch(&PageRequest { page: 2, pages_to_bring: 2, rowsperpage: 50 })?;
    assert_eq!(response.rows.len(), 100);
    assert_eq!(response.rows[0]["id"], 51);

    let _ = fs::remove_file(&path);
    Ok(())
}
