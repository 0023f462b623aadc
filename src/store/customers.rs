use crate::db_models::{Customer, CustomerRecord, NewCustomer, NewUser, User};
use crate::errors::custom::CrmError;
use crate::schema::{customers, users};
use crate::validations::customer::{CustomerPhone, UserEmail, UserName};
use diesel::prelude::*;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::instrument;
use uuid::Uuid;

/// Validated input for a new customer profile and its account identity.
#[derive(Debug)]
pub struct CustomerDraft {
    pub username: UserName,
    pub email: UserEmail,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<CustomerPhone>,
    pub address: Option<String>,
}

/// Creates the user and the customer profile in one transaction.
#[instrument(
    name = "Create customer",
    skip(conn, draft),
    fields(username = %draft.username.as_ref(), email = %draft.email.as_ref())
)]
pub async fn create(
    conn: &mut AsyncPgConnection,
    draft: CustomerDraft,
) -> Result<CustomerRecord, CrmError> {
    conn.transaction::<_, CrmError, _>(|conn| {
        async move {
            let email_taken: bool = diesel::select(diesel::dsl::exists(
                users::table.filter(users::email.eq(draft.email.as_ref())),
            ))
            .get_result(conn)
            .await?;
            if email_taken {
                return Err(CrmError::ValidationError("Email already exists".to_string()));
            }

            let user = diesel::insert_into(users::table)
                .values(&NewUser {
                    id: Uuid::new_v4(),
                    username: draft.username.as_ref(),
                    email: draft.email.as_ref(),
                    first_name: &draft.first_name,
                    last_name: &draft.last_name,
                })
                .returning(User::as_returning())
                .get_result(conn)
                .await
                .map_err(CrmError::insertion)?;

            let customer = diesel::insert_into(customers::table)
                .values(&NewCustomer {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    phone: draft.phone.as_ref().map(|phone| phone.as_ref()),
                    address: draft.address.as_deref(),
                })
                .returning(Customer::as_returning())
                .get_result(conn)
                .await
                .map_err(CrmError::insertion)?;

            Ok(CustomerRecord { customer, user })
        }
        .scope_boxed()
    })
    .await
}

#[instrument(name = "Get customer", skip(conn))]
pub async fn find(conn: &mut AsyncPgConnection, id: Uuid) -> Result<CustomerRecord, CrmError> {
    customers::table
        .inner_join(users::table)
        .filter(customers::id.eq(id))
        .select((Customer::as_select(), User::as_select()))
        .first::<(Customer, User)>(conn)
        .await
        .optional()?
        .map(CustomerRecord::from)
        .ok_or_else(|| CrmError::NotFound(format!("Customer {} does not exist", id)))
}

/// All customers, newest first.
#[instrument(name = "List customers", skip(conn))]
pub async fn list(conn: &mut AsyncPgConnection) -> Result<Vec<CustomerRecord>, CrmError> {
    let rows = customers::table
        .inner_join(users::table)
        .select((Customer::as_select(), User::as_select()))
        .order(customers::created_at.desc())
        .load::<(Customer, User)>(conn)
        .await?;
    Ok(rows.into_iter().map(CustomerRecord::from).collect())
}
