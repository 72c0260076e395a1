// 导入 serde 用于序列化和反序列化
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 目录服务摘要: { 服务名: [标签,...] }
pub type CatalogSummary = HashMap<String, Vec<String>>;

/// 目录中一个服务实例的记录
///
/// 每个运行该服务的节点对应一条记录。ServiceID只在其所属节点内唯一，
/// 同名服务可以有任意多条记录。除固定字段外，Consul还会返回
/// Node/ServicePort/Datacenter等字段，原样保留在extra中，
/// 过滤器可以按字段名引用它们。
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct ServiceRecord {
    /// 服务实例在其节点内的唯一标识
    #[serde(rename = "ServiceID")]
    pub service_id: String,
    /// 服务名称
    #[serde(rename = "ServiceName")]
    pub service_name: String,
    /// 服务标签，用于分类和过滤
    #[serde(rename = "ServiceTags", default)]
    pub service_tags: Vec<String>,
    /// 承载该实例的节点地址，可能不同于注册中心自身的地址
    #[serde(rename = "Address")]
    pub address: String,
    /// 其余字段原样保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ServiceRecord {
    /// 按字段名取出可用于过滤的字符串值
    ///
    /// 只有标量字段可以参与过滤：字符串原样返回，数字和布尔转为字符串，
    /// 列表/对象字段（包括ServiceTags）返回None。
    pub fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "ServiceID" => Some(self.service_id.clone()),
            "ServiceName" => Some(self.service_name.clone()),
            "Address" => Some(self.address.clone()),
            "ServiceTags" => None,
            _ => match self.extra.get(field)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            },
        }
    }
}

/// 单条注销操作的结果
#[derive(Debug, Clone)]
pub struct DeregisterOutcome {
    /// 注册中心是否接受了这次注销
    pub success: bool,
    /// 实际发出注销请求的端点
    pub endpoint: String,
    /// 被注销的服务ID
    pub service_id: String,
}

impl fmt::Display for DeregisterOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "OK" } else { "FAIL" };
        write!(
            f,
            "DEREGISTER_{:<7} CONSUL {:<40}    ID {}",
            status, self.endpoint, self.service_id
        )
    }
}
