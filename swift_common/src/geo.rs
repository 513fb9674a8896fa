/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! positions on the earth surface plus altitude. Distances and bearings are computed with the
//! [geo](https://docs.rs/geo/latest/geo/index.html) metric spaces, lengths are [uom](https://docs.rs/uom/latest/uom/) quantities

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::{Bearing, Distance, Haversine, Point};
use uom::si::f64::Length;
use uom::si::length::{meter,foot,nautical_mile};

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoPosition {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub altitude: Length,
}

impl GeoPosition {
    pub fn from_lat_lon_degrees (lat_deg: f64, lon_deg: f64)->Self {
        GeoPosition { lat_deg, lon_deg, altitude: Length::new::<meter>(0.0) }
    }

    pub fn from_lat_lon_degrees_alt_feet (lat_deg: f64, lon_deg: f64, alt_ft: f64)->Self {
        GeoPosition { lat_deg, lon_deg, altitude: Length::new::<foot>(alt_ft) }
    }

    pub fn is_valid (&self)->bool {
        self.lat_deg.is_finite() && self.lon_deg.is_finite() &&
        (-90.0..=90.0).contains(&self.lat_deg) && (-180.0..=180.0).contains(&self.lon_deg)
    }

    #[inline] pub fn point (&self)->Point { Point::new( self.lon_deg, self.lat_deg) }

    /// great circle distance (ignoring altitude)
    pub fn distance_to (&self, other: &GeoPosition)->Length {
        Length::new::<meter>( Haversine.distance( self.point(), other.point()))
    }

    /// initial bearing from self to `other` in degrees [0,360)
    pub fn bearing_to (&self, other: &GeoPosition)->f64 {
        Haversine.bearing( self.point(), other.point()).rem_euclid(360.0)
    }

    pub fn altitude_ft (&self)->f64 { self.altitude.get::<foot>() }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "({:.5},{:.5} {:.0}ft)", self.lat_deg, self.lon_deg, self.altitude.get::<foot>())
    }
}

#[inline] pub fn meters (m: f64)->Length { Length::new::<meter>(m) }
#[inline] pub fn nautical_miles (nm: f64)->Length { Length::new::<nautical_mile>(nm) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_bearing () {
        let eddf = GeoPosition::from_lat_lon_degrees( 50.0333, 8.5706);
        let eddm = GeoPosition::from_lat_lon_degrees( 48.3538, 11.7861);

        let d = eddf.distance_to(&eddm).get::<nautical_mile>();
        println!("EDDF-EDDM: {d:.1}nm");
        assert!( d > 150.0 && d < 175.0);

        let b = eddf.bearing_to(&eddm);
        assert!( b > 120.0 && b < 140.0);

        let b = eddm.bearing_to(&eddf);
        assert!( b > 300.0 && b < 320.0);
    }
}
