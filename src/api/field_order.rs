//! Declaration order of a request's fields.
//!
//! `validator` keeps its errors in a hash map, so the order in which fields
//! were declared is recovered from the value's `Serialize` impl: a serializer
//! that records keys and drops values.

use serde::de::value::Error;
use serde::ser::{
    Error as _, Impossible, Serialize, SerializeMap, SerializeStruct, Serializer,
};
use serde_json::Value;

/// Dotted paths of the struct fields and map keys of `value`, parents first,
/// in serialization order. Fields skipped by `skip_serializing_if` are kept.
pub fn field_paths<T: Serialize + ?Sized>(value: &T) -> Vec<String> {
    let mut paths = Vec::new();
    let _ = value.serialize(Recorder {
        prefix: "",
        paths: &mut paths,
    });
    paths
}

/// Position of `path` in `paths`, or of its closest recorded parent.
/// Unknown paths rank last.
pub fn rank(paths: &[String], path: &str) -> usize {
    let mut candidate = path;
    loop {
        if let Some(index) = paths.iter().position(|p| p == candidate) {
            return index;
        }
        match candidate.rfind(['.', '[']) {
            Some(cut) => candidate = &candidate[..cut],
            None => return usize::MAX,
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

struct Recorder<'a> {
    prefix: &'a str,
    paths: &'a mut Vec<String>,
}

macro_rules! skip_values {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _value: $ty) -> Result<(), Error> {
                Ok(())
            }
        )*
    };
}

impl<'a> Serializer for Recorder<'a> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Fields<'a>;
    type SerializeStruct = Fields<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    skip_values! {
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    }

    fn serialize_none(self) -> Result<(), Error> {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Error> {
        Err(Error::custom("sequences have no field order"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Error> {
        Err(Error::custom("tuples have no field order"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Error> {
        Err(Error::custom("tuples have no field order"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Error> {
        Err(Error::custom("tuples have no field order"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        Ok(Fields::new(self))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Error> {
        Ok(Fields::new(self))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Error> {
        Err(Error::custom("variants have no field order"))
    }
}

struct Fields<'a> {
    prefix: &'a str,
    paths: &'a mut Vec<String>,
    key: Option<String>,
}

impl<'a> Fields<'a> {
    fn new(recorder: Recorder<'a>) -> Self {
        Self {
            prefix: recorder.prefix,
            paths: recorder.paths,
            key: None,
        }
    }

    fn record(&mut self, key: &str) -> String {
        let path = join(self.prefix, key);
        self.paths.push(path.clone());
        path
    }

    fn descend<T: ?Sized + Serialize>(&mut self, path: &str, value: &T) {
        let _ = value.serialize(Recorder {
            prefix: path,
            paths: &mut *self.paths,
        });
    }
}

impl SerializeStruct for Fields<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Error> {
        let path = self.record(key);
        self.descend(&path, value);
        Ok(())
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Error> {
        self.record(key);
        Ok(())
    }

    fn end(self) -> Result<(), Error> {
        Ok(())
    }
}

// Flattened structs serialize as maps.
impl SerializeMap for Fields<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Error> {
        self.key = match serde_json::to_value(key) {
            Ok(Value::String(key)) => Some(key),
            _ => None,
        };
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        if let Some(key) = self.key.take() {
            let path = self.record(&key);
            self.descend(&path, value);
        }
        Ok(())
    }

    fn end(self) -> Result<(), Error> {
        Ok(())
    }
}
