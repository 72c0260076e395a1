use common::filter;
use common::service_register_center::{Registry, ServiceRecord};
use common::Result;

/// 打印排序后的所有服务名，每行一个
pub async fn list_services(registry: &mut Registry) -> Result<()> {
    for name in registry.service_names().await? {
        println!("{}", name);
    }
    Ok(())
}

/// 打印排序后的所有标签，每行一个
pub async fn list_tags(registry: &mut Registry) -> Result<()> {
    for tag in registry.all_tags().await? {
        println!("{}", tag);
    }
    Ok(())
}

/// 输出某个服务名下全部记录的完整JSON
pub async fn service_info(registry: &mut Registry, service_name: &str) -> Result<()> {
    let records: Vec<ServiceRecord> = registry
        .all_records()
        .await?
        .into_iter()
        .filter(|record| record.service_name == service_name)
        .collect();

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// 注销所有ServiceID精确匹配的记录
pub async fn del_by_id(registry: &mut Registry, service_id: &str) -> Result<()> {
    let records: Vec<ServiceRecord> = registry
        .all_records()
        .await?
        .into_iter()
        .filter(|record| record.service_id == service_id)
        .collect();

    deregister_and_report(registry, &records).await
}

/// 注销所有ServiceName精确匹配的记录
pub async fn del_by_name(registry: &mut Registry, service_name: &str) -> Result<()> {
    let records: Vec<ServiceRecord> = registry
        .all_records()
        .await?
        .into_iter()
        .filter(|record| record.service_name == service_name)
        .collect();

    deregister_and_report(registry, &records).await
}

/// 注销所有带有指定标签的记录，标签按精确成员匹配
pub async fn del_by_tag(registry: &mut Registry, tag_name: &str) -> Result<()> {
    let records: Vec<ServiceRecord> = registry
        .all_records()
        .await?
        .into_iter()
        .filter(|record| record.service_tags.iter().any(|tag| tag == tag_name))
        .collect();

    deregister_and_report(registry, &records).await
}

/// 按过滤器列出记录；-v输出完整JSON，否则只输出服务名
pub async fn list_filtered(registry: &mut Registry, specs: &[String], verbose: bool) -> Result<()> {
    let records = filtered_records(registry, specs).await?;

    if verbose {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", record.service_name);
        }
    }
    Ok(())
}

/// 注销所有命中过滤器的记录
pub async fn del_filtered(registry: &mut Registry, specs: &[String]) -> Result<()> {
    let records = filtered_records(registry, specs).await?;
    deregister_and_report(registry, &records).await
}

// 过滤器在任何注册中心访问之前编译，非法过滤器直接终止命令
async fn filtered_records(registry: &mut Registry, specs: &[String]) -> Result<Vec<ServiceRecord>> {
    let filters = filter::compile(specs)?;
    let mut records = filter::filter_all(registry.all_records().await?, &filters);
    records.sort_by(|a, b| a.service_name.cmp(&b.service_name));
    Ok(records)
}

// 每条记录一行状态输出，单条失败不影响整体退出码
async fn deregister_and_report(registry: &mut Registry, records: &[ServiceRecord]) -> Result<()> {
    for outcome in registry.deregister_all(records).await? {
        println!("{}", outcome);
    }
    Ok(())
}
