/// Sea-ORM entities for the orders and order_lines tables.
pub mod order {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "orders")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Option<Uuid>,
        pub status_id: Option<Uuid>,
        #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
        pub total_price: Decimal,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::line::Entity")]
        Lines,
    }

    impl Related<super::line::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Lines.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Order {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                user_id: model.user_id,
                status_id: model.status_id,
                total_price: model.total_price,
                created_at: model.created_at.into(),
                updated_at: model.updated_at.into(),
            }
        }
    }

    impl From<crate::models::Order> for ActiveModel {
        fn from(order: crate::models::Order) -> Self {
            ActiveModel {
                id: Set(order.id),
                user_id: Set(order.user_id),
                status_id: Set(order.status_id),
                total_price: Set(order.total_price),
                created_at: Set(order.created_at.into()),
                updated_at: Set(order.updated_at.into()),
            }
        }
    }
}

pub mod line {
    use sea_orm::entity::prelude::*;
    use sea_orm::ActiveValue::Set;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "order_lines")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub order_id: Uuid,
        pub product_id: Option<Uuid>,
        pub quantity: i32,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::order::Entity",
            from = "Column::OrderId",
            to = "super::order::Column::Id"
        )]
        Order,
    }

    impl Related<super::order::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Order.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::OrderLine {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                order_id: model.order_id,
                product_id: model.product_id,
                quantity: model.quantity,
                created_at: model.created_at.into(),
            }
        }
    }

    impl From<crate::models::OrderLine> for ActiveModel {
        fn from(line: crate::models::OrderLine) -> Self {
            ActiveModel {
                id: Set(line.id),
                order_id: Set(line.order_id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                created_at: Set(line.created_at.into()),
            }
        }
    }
}
