//! Direct calls through the AWS adapters.

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use dynoscale_aws::{CloudWatchMetrics, DynamoDbTables};
    use dynoscale_core::service::{CapacityMetadata, ConsumptionMetrics, ResourceRegistry};
    use dynoscale_core::{Direction, MetricWindow, ProvisionedCapacity, Unit};

    use crate::{
        cleanup_table, cloudwatch_client, create_provisioned_table, dynamodb_client,
        test_table_name,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_and_describe_created_table() {
        let client = dynamodb_client();
        let table = test_table_name("describe");
        create_provisioned_table(&client, &table, (7, 4), Some(("by-gsk", (5, 6)))).await;
        let tables = DynamoDbTables::new(client.clone());

        let names = tables.list_table_names().await.unwrap();
        assert!(names.contains(&table));

        let capacity = tables.provisioned_capacity(&table).await.unwrap();
        assert!(!capacity.on_demand);
        assert_eq!(
            capacity.capacity,
            ProvisionedCapacity {
                read: 7,
                write: 4,
                decreases_today: 0,
            }
        );

        let indexes = tables.secondary_indexes(&table).await.unwrap();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].index_name, "by-gsk");
        assert_eq!(indexes[0].capacity.read, 5);
        assert_eq!(indexes[0].capacity.write, 6);

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fetch_no_samples_for_fresh_table() {
        let metrics = CloudWatchMetrics::new(cloudwatch_client());
        let table = test_table_name("metrics");

        let window = MetricWindow::trailing(Utc::now(), 300);

        let samples = metrics
            .consumed_capacity(&Unit::table(&table), Direction::Read, &window)
            .await
            .unwrap();

        assert!(samples.is_empty());
    }
}
