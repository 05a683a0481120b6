use std::fmt;

use getset::Getters;
use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};

/// Keeps a field exactly as stored in the table, whatever its encoding.
fn raw_bytes<'de, D>(d: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RawBytes;

    impl<'de> Visitor<'de> for RawBytes {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a table field")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.as_bytes().to_vec())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v.into_bytes())
        }
    }

    d.deserialize_byte_buf(RawBytes)
}

/// One row of the organization table. Column order is fixed:
/// name, slug, idno, address, phone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct Organization {
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    name: Vec<u8>,
    /// File stem of the detail table and name of the output subdirectory.
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    slug: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    idno: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    address: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    phone: Vec<u8>,
}

/// One row of a per-organization detail table. Column order is fixed:
/// series, number, car model, car number, driver name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct Detail {
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    series: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    number: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    car_model: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    car_number: Vec<u8>,
    #[getset(get = "pub")]
    #[serde(deserialize_with = "raw_bytes")]
    driver_name: Vec<u8>,
}

impl Detail {
    /// Output file stem: the driver name with spaces turned into underscores.
    pub fn file_stem(&self) -> Vec<u8> {
        self.driver_name
            .iter()
            .map(|b| if *b == b' ' { b'_' } else { *b })
            .collect()
    }
}

#[cfg(test)]
impl Organization {
    pub fn new(name: &str, slug: &str, idno: &str, address: &str, phone: &str) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            idno: idno.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }
}

#[cfg(test)]
impl Detail {
    pub fn new(
        series: &str,
        number: &str,
        car_model: &str,
        car_number: &str,
        driver_name: &str,
    ) -> Self {
        Self {
            series: series.into(),
            number: number.into(),
            car_model: car_model.into(),
            car_number: car_number.into(),
            driver_name: driver_name.into(),
        }
    }
}
