use regex::Regex;

use crate::service_register_center::ServiceRecord;
use crate::{Error, Result};

/// 字段过滤器：字段名 + 已编译的正则
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: String,
    pub regex: Regex,
}

/// 编译一组 FIELD=REGEX 形式的过滤器
///
/// 只在第一个'='处拆分，正则部分可以继续包含'='。
/// 缺少'='或正则非法都在任何注册中心访问之前报错。
pub fn compile(specs: &[String]) -> Result<Vec<FieldFilter>> {
    specs
        .iter()
        .map(|spec| {
            let (field, pattern) = spec
                .split_once('=')
                .ok_or_else(|| Error::MalformedFilter(spec.clone()))?;
            let regex = Regex::new(pattern)?;
            Ok(FieldFilter {
                field: field.to_string(),
                regex,
            })
        })
        .collect()
}

/// 记录是否同时命中所有过滤器
///
/// 正则按子串搜索匹配，不是全串匹配；记录缺少某字段
/// （或字段不是标量）即视为不命中，首个落空的过滤器直接短路。
pub fn matches(record: &ServiceRecord, filters: &[FieldFilter]) -> bool {
    filters.iter().all(|filter| {
        record
            .field_text(&filter.field)
            .map(|value| filter.regex.is_match(&value))
            .unwrap_or(false)
    })
}

/// 过滤记录序列，保持输入的相对顺序
pub fn filter_all(records: Vec<ServiceRecord>, filters: &[FieldFilter]) -> Vec<ServiceRecord> {
    records
        .into_iter()
        .filter(|record| matches(record, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn named(name: &str) -> ServiceRecord {
        ServiceRecord {
            service_id: format!("{}-id", name),
            service_name: name.to_string(),
            address: "10.0.0.1".to_string(),
            ..Default::default()
        }
    }

    fn specs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn compile_splits_on_first_equals_only() {
        let filters = compile(&specs(&["x=a=b"])).unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].field, "x");
        assert_eq!(filters[0].regex.as_str(), "a=b");
    }

    #[test]
    fn compile_rejects_spec_without_equals() {
        let err = compile(&specs(&["ServiceName"])).unwrap_err();
        assert!(matches!(err, Error::MalformedFilter(_)));
    }

    #[test]
    fn compile_rejects_invalid_regex() {
        let err = compile(&specs(&["ServiceName=["])).unwrap_err();
        assert!(matches!(err, Error::InvalidRegex(_)));
    }

    #[test]
    fn match_is_a_substring_search() {
        let filters = compile(&specs(&["ServiceName=^web"])).unwrap();

        assert!(matches(&named("web-1"), &filters));
        assert!(matches(&named("webhook"), &filters));
        assert!(!matches(&named("api"), &filters));
    }

    #[test]
    fn missing_field_excludes_the_record() {
        let filters = compile(&specs(&["Datacenter=dc1"])).unwrap();
        assert!(!matches(&named("web"), &filters));
    }

    #[test]
    fn all_filters_must_match() {
        let filters = compile(&specs(&["ServiceName=web", "Address=^10\\."])).unwrap();
        assert!(matches(&named("web-1"), &filters));

        let filters = compile(&specs(&["ServiceName=web", "Address=^192\\."])).unwrap();
        assert!(!matches(&named("web-1"), &filters));
    }

    #[test]
    fn numeric_extra_fields_are_searchable_as_text() {
        let mut record = named("web");
        record
            .extra
            .insert("ServicePort".to_string(), Value::from(8080));

        let filters = compile(&specs(&["ServicePort=80"])).unwrap();
        assert!(matches(&record, &filters));
    }

    #[test]
    fn empty_filter_set_keeps_everything_in_order() {
        let records = vec![named("b"), named("a"), named("c")];
        let filtered = filter_all(records, &[]);
        let names: Vec<&str> = filtered.iter().map(|r| r.service_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn filter_all_preserves_relative_order() {
        let records = vec![named("web-2"), named("api"), named("web-1")];
        let filters = compile(&specs(&["ServiceName=^web"])).unwrap();
        let filtered = filter_all(records, &filters);
        let names: Vec<&str> = filtered.iter().map(|r| r.service_name.as_str()).collect();
        assert_eq!(names, vec!["web-2", "web-1"]);
    }
}
