//! Built-in catalog data
//!
//! Three sample surveys used when no catalog file is configured.

use std::collections::HashMap;

use crate::domain::{
    Annotation, AnnotationKind, FlightLog, Imagery, ImageryKind, Measurement, MeasurementKind, Plan, PlanDataBundle,
};

fn flight(id: &str, date: &str, duration: &str, altitude: &str, coverage: &str) -> FlightLog {
    FlightLog {
        id: id.to_string(),
        date: date.to_string(),
        duration: duration.to_string(),
        altitude: altitude.to_string(),
        coverage: coverage.to_string(),
    }
}

fn measurement(id: &str, kind: MeasurementKind, value: &str, coordinates: &str, description: &str) -> Measurement {
    Measurement {
        id: id.to_string(),
        kind,
        value: value.to_string(),
        coordinates: coordinates.to_string(),
        description: Some(description.to_string()),
    }
}

fn annotation(id: &str, kind: AnnotationKind, description: &str, coordinates: &str) -> Annotation {
    Annotation {
        id: id.to_string(),
        kind,
        description: description.to_string(),
        coordinates: coordinates.to_string(),
        properties: None,
    }
}

fn imagery(
    id: &str,
    kind: ImageryKind,
    resolution: Option<&str>,
    quality: Option<&str>,
    date: &str,
    url: &str,
) -> Imagery {
    Imagery {
        id: id.to_string(),
        kind,
        resolution: resolution.map(str::to_string),
        quality: quality.map(str::to_string),
        date: date.to_string(),
        url: Some(url.to_string()),
    }
}

/// Sample plans in catalog order
pub fn plans() -> Vec<Plan> {
    vec![
        Plan::new(
            "plan_001",
            "Downtown Construction Site",
            "2024-01-15",
            "San Francisco, CA",
            "completed",
        ),
        Plan::new("plan_002", "Residential Development", "2024-01-10", "Austin, TX", "completed"),
        Plan::new("plan_003", "Industrial Complex Survey", "2024-01-08", "Chicago, IL", "completed"),
    ]
}

/// Sample bundles keyed by plan id
pub fn plan_data() -> HashMap<String, PlanDataBundle> {
    let sf = "37.7749,-122.4194";
    let austin = "30.2672,-97.7431";
    let chicago = "41.8781,-87.6298";

    let mut data = HashMap::new();

    data.insert(
        "plan_001".to_string(),
        PlanDataBundle {
            flight_logs: vec![
                flight("1", "2024-01-15", "45min", "120m", "100%"),
                flight("2", "2024-01-10", "38min", "110m", "95%"),
            ],
            measurements: vec![
                measurement("1", MeasurementKind::Area, "2.5 acres", sf, "Total site area"),
                measurement("2", MeasurementKind::Volume, "1500 cubic meters", sf, "Excavation volume"),
                measurement("3", MeasurementKind::Distance, "250m", sf, "Site perimeter"),
            ],
            annotations: vec![
                annotation("1", AnnotationKind::Marker, "Equipment location", sf),
                annotation("2", AnnotationKind::Polygon, "Construction zone", sf),
                annotation("3", AnnotationKind::Line, "Safety boundary", sf),
            ],
            imagery: vec![
                imagery(
                    "1",
                    ImageryKind::Orthomosaic,
                    Some("2cm/pixel"),
                    None,
                    "2024-01-15",
                    "https://example.com/ortho.jpg",
                ),
                imagery(
                    "2",
                    ImageryKind::Model3d,
                    None,
                    Some("high"),
                    "2024-01-15",
                    "https://example.com/3d-model.glb",
                ),
            ],
        },
    );

    data.insert(
        "plan_002".to_string(),
        PlanDataBundle {
            flight_logs: vec![flight("1", "2024-01-10", "52min", "100m", "100%")],
            measurements: vec![measurement(
                "1",
                MeasurementKind::Area,
                "1.8 acres",
                austin,
                "Development area",
            )],
            annotations: vec![annotation("1", AnnotationKind::Marker, "Foundation markers", austin)],
            imagery: vec![imagery(
                "1",
                ImageryKind::Orthomosaic,
                Some("3cm/pixel"),
                None,
                "2024-01-10",
                "https://example.com/ortho2.jpg",
            )],
        },
    );

    data.insert(
        "plan_003".to_string(),
        PlanDataBundle {
            flight_logs: vec![flight("1", "2024-01-08", "40min", "90m", "100%")],
            measurements: vec![
                measurement("1", MeasurementKind::Area, "5.2 acres", chicago, "Industrial complex area"),
                measurement("2", MeasurementKind::Volume, "3000 cubic meters", chicago, "Storage capacity"),
            ],
            annotations: vec![
                annotation("1", AnnotationKind::Polygon, "Storage facility", chicago),
                annotation("2", AnnotationKind::Marker, "Loading dock", chicago),
            ],
            imagery: vec![
                imagery(
                    "1",
                    ImageryKind::Orthomosaic,
                    Some("2.5cm/pixel"),
                    None,
                    "2024-01-08",
                    "https://example.com/ortho3.jpg",
                ),
                imagery(
                    "2",
                    ImageryKind::PointCloud,
                    None,
                    Some("medium"),
                    "2024-01-08",
                    "https://example.com/pointcloud.las",
                ),
            ],
        },
    );

    data
}
