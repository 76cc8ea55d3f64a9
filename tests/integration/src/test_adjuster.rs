//! End-to-end adjuster runs against a running emulator.

#[cfg(test)]
mod tests {
    use dynoscale_core::{CapacityAdjuster, DynoscaleConfig, Unit};

    use crate::{
        cleanup_table, create_provisioned_table, dynamodb_client, scoped_services,
        test_table_name,
    };

    async fn provisioned(client: &aws_sdk_dynamodb::Client, table: &str) -> (i64, i64) {
        let output = client.describe_table().table_name(table).send().await.unwrap();
        let throughput = output
            .table()
            .and_then(|t| t.provisioned_throughput())
            .expect("provisioned throughput");
        (
            throughput.read_capacity_units().unwrap_or_default(),
            throughput.write_capacity_units().unwrap_or_default(),
        )
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_lower_idle_table_to_minimum() {
        let client = dynamodb_client();
        let table = test_table_name("idle");
        create_provisioned_table(&client, &table, (10, 10), None).await;

        let adjuster =
            CapacityAdjuster::new(DynoscaleConfig::default(), scoped_services(&[table.as_str()]));
        let report = adjuster.run().await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].unit, Unit::table(&table));
        assert_eq!(report[0].new_read_capacity, 3);
        assert_eq!(report[0].new_write_capacity, 3);
        assert_eq!(provisioned(&client, &table).await, (3, 3));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_adjust_secondary_index() {
        let client = dynamodb_client();
        let table = test_table_name("gsi");
        create_provisioned_table(&client, &table, (3, 3), Some(("by-gsk", (12, 12)))).await;

        let adjuster =
            CapacityAdjuster::new(DynoscaleConfig::default(), scoped_services(&[table.as_str()]));
        let report = adjuster.run().await.unwrap();

        assert_eq!(report.len(), 2);
        assert!(!report[0].is_changed());
        assert_eq!(report[1].unit, Unit::index(&table, "by-gsk"));
        assert_eq!(report[1].new_read_capacity, 3);
        assert_eq!(report[1].new_write_capacity, 3);
        assert_eq!(provisioned(&client, &table).await, (3, 3));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_leave_table_untouched_in_dry_run() {
        let client = dynamodb_client();
        let table = test_table_name("dry");
        create_provisioned_table(&client, &table, (10, 10), None).await;

        let config = DynoscaleConfig::builder().dry_run(true).build();
        let adjuster = CapacityAdjuster::new(config, scoped_services(&[table.as_str()]));
        let report = adjuster.run().await.unwrap();

        assert!(report[0].is_changed());
        assert_eq!(provisioned(&client, &table).await, (10, 10));

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_on_missing_table() {
        let table = test_table_name("missing");

        let adjuster =
            CapacityAdjuster::new(DynoscaleConfig::default(), scoped_services(&[table.as_str()]));
        let err = adjuster.run().await.unwrap_err();

        assert!(err.to_string().contains("DescribeTable"));
    }
}
