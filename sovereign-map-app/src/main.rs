use anyhow::Context;
use sovereign_map::{
    data::{load_geometry_file, loader::WORLD_ATLAS_URL},
    insight::{GeminiClient, InsightOutcome},
    prelude::*,
};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 800.0;
const FRAME: Duration = Duration::from_millis(16);

/// Replays a scripted pointer session against a world map and prints every
/// controller event as a JSON line.
///
/// Usage: `sovereign-map-app [path-or-url | --world]`. Without an argument a
/// small built-in geometry is used.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sovereign_map::init_logging();

    let geometry = match std::env::args().nth(1).as_deref() {
        Some("--world") => fetch_geometry(WORLD_ATLAS_URL).await,
        Some(source) if source.starts_with("http://") || source.starts_with("https://") => {
            fetch_geometry(source).await
        }
        Some(path) => load_geometry_file(path),
        None => Ok(sample_geometry()),
    }
    .context("loading region boundaries")?;

    let mut map = WorldMapBuilder::world_map(WIDTH, HEIGHT)
        .with_geometry(Ok(geometry))
        .build();
    if let Some(error) = map.load_error() {
        anyhow::bail!("map did not initialize: {}", error);
    }

    let target = map
        .viewport()
        .and_then(|viewport| viewport.geometry().regions().first())
        .map(|region| region.id.clone())
        .context("geometry has no regions")?;
    let selected_name = replay(&mut map, &target)?;

    for (landmark, position) in map.landmark_positions() {
        println!("# {} {} at ({:.1}, {:.1})", landmark.label, landmark.name, position.x, position.y);
    }

    match GeminiClient::from_env() {
        Ok(client) => {
            let mut desk = InsightDesk::new(client);
            match desk.insight(&selected_name).await {
                InsightOutcome::Ready(insight) => {
                    println!("{}", serde_json::to_string_pretty(&insight)?);
                }
                InsightOutcome::Unavailable(message) => println!("# {}", message),
            }
        }
        Err(e) => log::info!("skipping region briefing: {}", e),
    }

    map.teardown();
    Ok(())
}

/// Hovers the region, waits for the tooltip, clicks it, plays the fit
/// animation to the end, then zooms and leaves. Returns the region name.
fn replay(map: &mut WorldMap, region_id: &str) -> anyhow::Result<String> {
    let viewport = map.viewport().context("map is not ready")?;
    let region_bounds = viewport
        .region_screen_bounds(region_id)
        .context("region has no screen extent")?;
    let centre = region_bounds.center();

    let mut now = Instant::now();
    emit(map.handle(InputEvent::PointerMove { position: centre }, now))?;

    now += viewport_delay(map);
    emit(map.tick(now))?;
    if let Some(tooltip) = map.tooltip() {
        println!(
            "# tooltip {} / {} / risk {}",
            tooltip.region_name,
            tooltip.capital,
            tooltip.risk.label()
        );
    }

    let selected = map.select_region(region_id, now)?;
    emit(selected.clone())?;
    let name = selected
        .iter()
        .find_map(|event| match event {
            ViewportEvent::RegionSelected { name, .. } => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_else(|| region_id.to_string());

    let mut frames = 0usize;
    while map.viewport().map_or(false, GeoViewport::is_animating) {
        now += FRAME;
        let events = map.tick(now);
        frames += 1;
        if events.iter().any(|e| matches!(e, ViewportEvent::AnimationFinished { .. })) {
            emit(events)?;
        }
    }
    log::info!("fit animation settled after {} frames", frames);

    emit(map.handle(InputEvent::Scroll { delta: 0.5, position: centre }, now))?;
    emit(map.handle(InputEvent::Drag { delta: Point::new(-40.0, 15.0) }, now))?;
    emit(map.handle(InputEvent::PointerLeave, now))?;

    for state in map.render_state().iter().filter(|s| s.style != RegionStyle::Normal) {
        println!("# {} is {:?}", state.name, state.style);
    }
    Ok(name)
}

fn viewport_delay(map: &WorldMap) -> Duration {
    map.viewport()
        .map(|viewport| viewport.config().tooltip_delay())
        .unwrap_or_default()
}

fn emit(events: Vec<ViewportEvent>) -> anyhow::Result<()> {
    for event in events {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

fn sample_geometry() -> Geometry {
    let block = |id: &str, name: &str, west: f64, south: f64, east: f64, north: f64| {
        Region::from_rings(
            id,
            name,
            &[vec![[west, south], [east, south], [east, north], [west, north], [west, south]]],
        )
    };
    Geometry::new(vec![
        block("250", "France", -4.8, 42.3, 8.2, 51.1),
        block("152", "Chile", -75.6, -55.9, -66.4, -17.5),
        block("036", "Australia", 113.3, -43.6, 153.6, -10.7),
    ])
}
