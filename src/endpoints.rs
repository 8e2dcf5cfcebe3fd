//! Endpoint catalog for the EC open platform.
//!
//! Each entry is just a method and a path relative to the API root. The few
//! parameter shapes that need more than a literal JSON object are built by
//! the helper functions at the bottom.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};

use crate::types::Method;

macro_rules! endpoints {
    ($($variant:ident => ($method:ident, $name:literal, $path:literal)),+ $(,)?) => {
        /// Known EC open platform operations
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Endpoint {
            $($variant),+
        }

        impl Endpoint {
            pub const ALL: &'static [Endpoint] = &[$(Endpoint::$variant),+];

            pub fn method(&self) -> Method {
                match self {
                    $(Self::$variant => Method::$method),+
                }
            }

            /// Path relative to the versioned API root.
            pub fn path(&self) -> &'static str {
                match self {
                    $(Self::$variant => $path),+
                }
            }

            /// Operation name as documented by the platform.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }
    };
}

endpoints! {
    // Organization
    Structure => (Get, "structure", "user/structure"),
    FindUserInfoById => (Get, "findUserInfoById", "user/findUserInfoById"),

    // Customers
    AddCustomer => (Post, "addCustomer", "customer/addCustomer"),
    CreateCustomer => (Post, "createCustomer", "customer/create"),
    GetCustomer => (Get, "getCustomer", "customer/get"),
    RangeQueryCustomer => (Post, "rangeQueryCustomer", "customer/rangeQueryCustomer"),
    GetCustomFieldMapping => (Post, "getCustomFieldMapping", "customer/getCustomFieldMapping"),
    GetCustomerGroup => (Post, "getCustomerGroup", "customer/getCustomerGroup"),
    UpdateCustomer => (Post, "updateCustomer", "customer/updateCustomer"),
    GetChannelSource => (Get, "getChannelSource", "customer/getChannelSource"),
    ChangeCrmFollowUser => (Post, "changeCrmFollowUser", "customer/changeCrmFollowUser"),
    AbandonCustomer => (Post, "abandonCustomer", "customer/abandon"),
    DeletedCustomers => (Post, "delcrms", "customer/delcrms"),
    GetCrmVisitDetails => (Post, "getCrmVisitDetails", "customer/getCrmVisitDetails"),
    GetTrajectory => (Post, "getTrajectory", "customer/getTrajectory"),

    // Labels
    AddLabelGroup => (Post, "addLabelGroup", "label/addLabelGroup"),
    AddLabel => (Post, "addLabel", "label/addLabel"),
    UpdateLabel => (Post, "updateLabel", "label/update"),
    GetLabelInfo => (Post, "getLabelInfo", "label/getLabelInfo"),

    // Follow-up trajectories
    SaveUserTrajectory => (Post, "saveUserTrajectory", "trajectory/saveUserTrajectory"),
    FindUserTrajectory => (Post, "findUserTrajectory", "trajectory/findUserTrajectory"),
    FindHistoryUserTrajectory => (Post, "findHistoryUserTrajectory", "trajectory/findHistoryUserTrajectory"),

    // Call and SMS records
    TelRecord => (Post, "telRecord", "record/telRecord"),
    TelRecordHistory => (Post, "telRecordHistory", "record/telRecordHistory"),
    SendSms => (Post, "sendSms", "record/sendSms"),
    SendSmsHistory => (Post, "sendSmsHistory", "record/sendSmsHistory"),
    AddTelRecord => (Post, "addTelRecord", "record/addTelRecord"),

    // Sales
    GetSalesFieldMapping => (Get, "getSalesFieldMapping", "sales/getSalesFieldMapping"),
    AddSales => (Post, "addSales", "sales/addSales"),
    UpdateSales => (Post, "updateSales", "sales/updateSales"),
    UpdateSalesStatus => (Post, "updateStatus", "sales/updateStatus"),
    GetSales => (Post, "getSales", "sales/getSales"),
    GetSalesDetail => (Post, "getSalesDetail", "sales/getSalesDetail"),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name(), self.method(), self.path())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    /// Accepts the operation name or the relative path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('/');
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(s) || e.path() == s)
            .ok_or_else(|| format!("unknown endpoint: {}", s))
    }
}

/// Parameters for endpoints that take no input.
///
/// The platform has always received an empty JSON array here.
pub fn no_params() -> Value {
    json!([])
}

/// Wrap batch items as `{"list": items}`.
///
/// Used by batch label updates, trajectory saves and tel record imports.
pub fn wrap_list<T: Serialize>(items: T) -> Value {
    json!({ "list": items })
}

/// Lookup key for [`Endpoint::GetCustomer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerLookup {
    Mobile(String),
    Mobiles(Vec<String>),
    CrmIds(Vec<u64>),
}

/// Build the `customer/get` parameters for a lookup.
pub fn customer_query(lookup: &CustomerLookup) -> Value {
    let list: Vec<Value> = match lookup {
        CustomerLookup::Mobile(mobile) => vec![json!({ "mobile": mobile })],
        CustomerLookup::Mobiles(mobiles) => {
            mobiles.iter().map(|m| json!({ "mobile": m })).collect()
        }
        CustomerLookup::CrmIds(ids) => ids.iter().map(|id| json!({ "crmId": id })).collect(),
    };
    wrap_list(list)
}

/// Parameters for [`Endpoint::FindUserInfoById`]. The platform prefers
/// `user_id` when both are set.
pub fn find_user(account: &str, user_id: &str) -> Value {
    json!({ "userId": user_id, "account": account })
}

/// Parameters for [`Endpoint::GetCustomFieldMapping`]: 1 for customer
/// fields, 2 for company fields.
pub fn custom_field_mapping(kind: u8) -> Value {
    json!({ "type": kind })
}

/// Parameters for [`Endpoint::AddLabelGroup`].
///
/// `color` ranges over `c1`..`c20` (default `c1`). `single_choice` makes the
/// group's labels mutually exclusive.
pub fn label_group(user_id: u64, name: &str, color: Option<&str>, single_choice: bool) -> Value {
    json!({
        "name": name,
        "type": if single_choice { 1 } else { 0 },
        "color": color.unwrap_or("c1"),
        "userId": user_id,
    })
}

/// Parameters for [`Endpoint::AddLabel`]. `group` is a group id or name.
pub fn label(name: &str, group: &str, user_id: u64) -> Value {
    json!({ "name": name, "groupValue": group, "userId": user_id })
}

/// Parameters for [`Endpoint::DeletedCustomers`].
///
/// Times are `yyyy-MM-dd HH:mm:ss`, at most seven days apart. `last_id` is
/// the id of the last record of the previous page, empty for the first.
pub fn deleted_customers(start_time: &str, end_time: &str, last_id: &str) -> Value {
    json!({ "startTime": start_time, "endTime": end_time, "lastId": last_id })
}
