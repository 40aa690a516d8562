use bus_locator::cache::{CacheConfig, CachedStrideClient};
use bus_locator::domain::RouteMkt;
use bus_locator::geo::GeoPoint;
use bus_locator::stride::{StrideClient, StrideConfig};
use bus_locator::tracker::{BusTracker, TrackerConfig, TrackerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Route configuration from environment
    let route_mkt = std::env::var("ROUTE_MKT").expect("ROUTE_MKT must be set (e.g. 23056)");
    let route_mkt = RouteMkt::parse(&route_mkt).expect("ROUTE_MKT must be a numeric token");

    let mut config = TrackerConfig::default();
    if let Ok(name) = std::env::var("ROUTE_FILTER_NAME") {
        config = config.with_filter_name(name);
    }
    if let Ok(direction) = std::env::var("ROUTE_DIRECTION") {
        config = config.with_direction(direction);
    }
    if let (Ok(lat), Ok(lon)) = (std::env::var("REF_LAT"), std::env::var("REF_LON")) {
        let lat: f64 = lat.parse().expect("REF_LAT must be a number");
        let lon: f64 = lon.parse().expect("REF_LON must be a number");
        let point = GeoPoint::new(lat, lon).expect("REF_LAT/REF_LON out of range");
        config = config.with_reference_point(point);
    }

    // Create Stride client with caching
    let client = StrideClient::new(StrideConfig::new()).expect("Failed to create Stride client");
    let cached = CachedStrideClient::new(client, &CacheConfig::default());

    let tracker = BusTracker::with_config(cached, route_mkt, config);

    println!("Fetching vehicle locations for route_mkt {}...", tracker.route_mkt());

    match tracker.ride_summaries().await {
        Ok(summaries) if summaries.is_empty() => {
            println!("No active rides in the lookback window.");
        }
        Ok(summaries) => {
            for info in &summaries {
                println!();
                println!("Ride {}:", info.ride_id);
                if let Some(vehicle) = &info.vehicle_ref {
                    println!("  Vehicle:  {vehicle}");
                }
                println!("  Location: ({})", info.location.point);
                println!("  Updated:  {}", info.location.recorded_at);
                if let Some(speed) = info.location.speed_kmh {
                    println!("  Speed:    {speed:.1} km/h");
                }
                println!("  From start: {:.1} m", info.distance_from_start_m);
                if let Some(d) = info.distance_from_ref_m {
                    println!("  From ref:   {d:.1} m");
                }
            }
        }
        Err(TrackerError::RouteNotFound { route_mkt }) => {
            eprintln!("No route found for route_mkt {route_mkt} with the given filters.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to fetch bus info: {e}");
            std::process::exit(1);
        }
    }
}
