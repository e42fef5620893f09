use std::collections::HashMap;
use std::fmt;


/// The kind of per-document value a field stores in its doc values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocValuesType {
    /// A single integer per document
    Numeric,

    /// A single byte array per document
    Binary,

    /// A single value per document, deduplicated into an ordered dictionary
    Sorted,

    /// Any number of dictionary values per document
    SortedSet,

    /// Any number of integers per document
    SortedNumeric,
}


impl fmt::Display for DocValuesType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            DocValuesType::Numeric => "NUMERIC",
            DocValuesType::Binary => "BINARY",
            DocValuesType::Sorted => "SORTED",
            DocValuesType::SortedSet => "SORTED_SET",
            DocValuesType::SortedNumeric => "SORTED_NUMERIC",
        };

        write!(f, "{}", name)
    }
}


#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldRef(u32);


impl FieldRef {
    pub fn new(ord: u32) -> FieldRef {
        FieldRef(ord)
    }

    pub fn ord(&self) -> u32 {
        self.0
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub field_ref: FieldRef,
    pub doc_values_type: DocValuesType,
}


impl FieldInfo {
    pub fn new(name: String, field_ref: FieldRef, doc_values_type: DocValuesType) -> FieldInfo {
        FieldInfo {
            name: name,
            field_ref: field_ref,
            doc_values_type: doc_values_type,
        }
    }

    /// The field number written to disk
    #[inline]
    pub fn number(&self) -> u32 {
        self.field_ref.ord()
    }
}


#[derive(Debug, PartialEq)]
pub enum AddFieldError {
    FieldAlreadyExists(String),
}


/// Registry of the fields in a segment, by name and by number
#[derive(Debug, Clone)]
pub struct FieldInfos {
    next_field_id: u32,
    fields: HashMap<FieldRef, FieldInfo>,
    field_names: HashMap<String, FieldRef>,
}


impl FieldInfos {
    pub fn new() -> FieldInfos {
        FieldInfos {
            next_field_id: 0,
            fields: HashMap::new(),
            field_names: HashMap::new(),
        }
    }

    fn new_field_ref(&mut self) -> FieldRef {
        let field_ref = FieldRef(self.next_field_id);
        self.next_field_id += 1;

        field_ref
    }

    pub fn get_field_by_name(&self, name: &str) -> Option<&FieldInfo> {
        self.field_names.get(name).and_then(|field_ref| self.fields.get(field_ref))
    }

    pub fn get_field_by_number(&self, number: u32) -> Option<&FieldInfo> {
        self.fields.get(&FieldRef(number))
    }

    pub fn add_field(&mut self, name: String, doc_values_type: DocValuesType) -> Result<FieldRef, AddFieldError> {
        if self.field_names.contains_key(&name) {
            return Err(AddFieldError::FieldAlreadyExists(name));
        }

        let field_ref = self.new_field_ref();
        let field_info = FieldInfo::new(name.clone(), field_ref, doc_values_type);

        self.fields.insert(field_ref, field_info);
        self.field_names.insert(name, field_ref);

        Ok(field_ref)
    }
}


#[cfg(test)]
mod tests {
    use super::{FieldInfos, FieldRef, DocValuesType, AddFieldError};

    #[test]
    fn test_add_field() {
        let mut field_infos = FieldInfos::new();
        let title = field_infos.add_field("title".to_string(), DocValuesType::Sorted).unwrap();
        let price = field_infos.add_field("price".to_string(), DocValuesType::Numeric).unwrap();

        assert_eq!(title, FieldRef::new(0));
        assert_eq!(price, FieldRef::new(1));

        let price_info = field_infos.get_field_by_name("price").unwrap();
        assert_eq!(price_info.number(), 1);
        assert_eq!(price_info.doc_values_type, DocValuesType::Numeric);
        assert_eq!(field_infos.get_field_by_number(0).unwrap().name, "title");
        assert!(field_infos.get_field_by_name("foo").is_none());
    }

    #[test]
    fn test_add_duplicate_field() {
        let mut field_infos = FieldInfos::new();
        field_infos.add_field("title".to_string(), DocValuesType::Sorted).unwrap();

        assert_eq!(
            field_infos.add_field("title".to_string(), DocValuesType::Binary),
            Err(AddFieldError::FieldAlreadyExists("title".to_string()))
        );
    }

    #[test]
    fn test_field_numbers_follow_insertion_order() {
        let mut field_infos = FieldInfos::new();
        field_infos.add_field("title".to_string(), DocValuesType::Sorted).unwrap();
        field_infos.add_field("tags".to_string(), DocValuesType::SortedSet).unwrap();
        field_infos.add_field("price".to_string(), DocValuesType::Numeric).unwrap();

        let numbers = (0..4).filter_map(|number| field_infos.get_field_by_number(number))
                            .map(|info| (info.name.as_str(), info.number()))
                            .collect::<::std::collections::HashMap<_, _>>();

        assert_eq!(numbers, hashmap! {
            "title" => 0,
            "tags" => 1,
            "price" => 2,
        });
    }
}
