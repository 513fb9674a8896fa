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

/// upper case ASCII letters and digits only, everything else removed
/// ("Lufthansa-Cargo AG" -> "LUFTHANSACARGOAG")
pub fn simplified_name (s: &str)->String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_uppercase()).collect()
}

/// true if non-empty and all chars are upper case ASCII letters or digits
pub fn is_upper_alnum (s: &str)->bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// first whitespace separated token, trimmed
pub fn first_token (s: &str)->&str {
    s.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplified () {
        assert_eq!( simplified_name("Lufthansa-Cargo AG"), "LUFTHANSACARGOAG");
        assert!( is_upper_alnum("A320"));
        assert!( !is_upper_alnum("a320"));
        assert!( !is_upper_alnum(""));
        assert_eq!( first_token("  DLH  Lufthansa"), "DLH");
    }
}
