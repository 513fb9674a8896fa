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

use std::{fs, path::Path};
use serde::de::DeserializeOwned;
use crate::errors::{SwiftCommonError,Result};

/// load a RON config file
pub fn load_ron_config<C,P> (path: P)->Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err( SwiftCommonError::ConfigNotFoundError( path.display().to_string()))
    }
    let data = fs::read(path)?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// load a RON config file or fall back to `C::default()` if there is no such file. Parse errors of
/// existing files are still reported
pub fn load_ron_config_or_default<C,P> (path: P)->Result<C> where C: DeserializeOwned + Default, P: AsRef<Path> {
    match load_ron_config( path) {
        Err(SwiftCommonError::ConfigNotFoundError(_)) => Ok( C::default()),
        other => other
    }
}

pub fn ron_config_from_str<C> (s: &str)->Result<C> where C: DeserializeOwned {
    Ok( ron::de::from_str(s)? )
}
