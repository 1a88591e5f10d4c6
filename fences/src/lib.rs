use geo_types::{Coord, LineString};
use serde::Serialize;

/// `[lon, lat, elevation]`, the order the shapes were exported from KML in.
pub type KmlCoord = [f64; 3];
/// `[lat, lon]`, the order the client map wants.
pub type LatLon = [f64; 2];

const TRACK_POLYGON: [KmlCoord; 43] = [
    [-122.6970419, 45.5957071, 0.0],
    [-122.6893068, 45.5936127, 0.0],
    [-122.6889849, 45.5936503, 0.0],
    [-122.6884163, 45.5936127, 0.0],
    [-122.6880408, 45.5936878, 0.0],
    [-122.6877726, 45.5939806, 0.0],
    [-122.6879013, 45.5942959, 0.0],
    [-122.6880837, 45.5946187, 0.0],
    [-122.6884378, 45.5950091, 0.0],
    [-122.6887274, 45.5951592, 0.0],
    [-122.6891673, 45.5952343, 0.0],
    [-122.6895214, 45.5953094, 0.0],
    [-122.6897252, 45.595452, 0.0],
    [-122.6905835, 45.5962703, 0.0],
    [-122.6921821, 45.5976891, 0.0],
    [-122.6939417, 45.5988714, 0.0],
    [-122.694462, 45.5991116, 0.0],
    [-122.6951862, 45.5993181, 0.0],
    [-122.6960552, 45.599487, 0.0],
    [-122.6963503, 45.5995057, 0.0],
    [-122.696817, 45.599487, 0.0],
    [-122.6974607, 45.5994907, 0.0],
    [-122.6977128, 45.5995395, 0.0],
    [-122.6986623, 45.5998285, 0.0],
    [-122.699231, 45.6000012, 0.0],
    [-122.6993597, 45.5999899, 0.0],
    [-122.6995046, 45.5999036, 0.0],
    [-122.6995314, 45.5997685, 0.0],
    [-122.6994187, 45.5986913, 0.0],
    [-122.6995099, 45.5983985, 0.0],
    [-122.6996655, 45.5981132, 0.0],
    [-122.6999176, 45.5979556, 0.0],
    [-122.7002717, 45.5978843, 0.0],
    [-122.7006253, 45.5979292, 0.0],
    [-122.7009901, 45.5982595, 0.0],
    [-122.7012262, 45.5985448, 0.0],
    [-122.7016768, 45.5987399, 0.0],
    [-122.7021274, 45.5987549, 0.0],
    [-122.702814, 45.5983946, 0.0],
    [-122.703093, 45.5980343, 0.0],
    [-122.7030715, 45.5975989, 0.0],
    [-122.7027926, 45.5972836, 0.0],
    [-122.6970419, 45.5957071, 0.0],
];

const CAMERA_1_FENCE: [KmlCoord; 11] = [
    [-122.6882533, 45.59542, 0.0],
    [-122.6895032, 45.5958892, 0.0],
    [-122.6899967, 45.595619, 0.0],
    [-122.6895246, 45.5952258, 0.0],
    [-122.6888058, 45.5947538, 0.0],
    [-122.6884665, 45.5943202, 0.0],
    [-122.6884095, 45.59414, 0.0],
    [-122.687395, 45.5944628, 0.0],
    [-122.6877061, 45.5950503, 0.0],
    [-122.6879582, 45.5952539, 0.0],
    [-122.6882533, 45.59542, 0.0],
];

const CAMERA_2_FENCE: [KmlCoord; 10] = [
    [-122.6887817, 45.5937647, 0.0],
    [-122.6885644, 45.5935076, 0.0],
    [-122.6880521, 45.5933593, 0.0],
    [-122.6875907, 45.5932673, 0.0],
    [-122.6873118, 45.5934156, 0.0],
    [-122.6870778, 45.5936417, 0.0],
    [-122.6870905, 45.5938078, 0.0],
    [-122.687395, 45.5944628, 0.0],
    [-122.6884095, 45.59414, 0.0],
    [-122.6887817, 45.5937647, 0.0],
];

/// Reorders `[lon, lat, elevation]` triples into `[lat, lon]` pairs. Elevation is dropped.
pub fn reverse_coordinates(coords: &[KmlCoord]) -> Vec<LatLon> {
    coords.iter().map(|&[lon, lat, _]| [lat, lon]).collect()
}

fn ring(coords: &[KmlCoord]) -> LineString<f64> {
    coords
        .iter()
        .map(|&[x, y, _]| Coord { x, y })
        .collect()
}

pub fn track_polygon() -> LineString<f64> {
    ring(&TRACK_POLYGON)
}

pub fn camera_1_fence() -> LineString<f64> {
    ring(&CAMERA_1_FENCE)
}

pub fn camera_2_fence() -> LineString<f64> {
    ring(&CAMERA_2_FENCE)
}

/// x is longitude, y is latitude
pub fn lat_lon_pairs(ring: &LineString<f64>) -> Vec<LatLon> {
    ring.coords().map(|c| [c.y, c.x]).collect()
}

/// The fixed shapes every map page is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapGeometry {
    pub track_polygon_coords: Vec<LatLon>,
    pub camera_1_fence_coords: Vec<LatLon>,
    pub camera_2_fence_coords: Vec<LatLon>,
}

impl MapGeometry {
    pub fn fixed() -> Self {
        MapGeometry {
            track_polygon_coords: reverse_coordinates(&TRACK_POLYGON),
            camera_1_fence_coords: reverse_coordinates(&CAMERA_1_FENCE),
            camera_2_fence_coords: reverse_coordinates(&CAMERA_2_FENCE),
        }
    }
}
