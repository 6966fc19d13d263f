use sqlx::PgConnection;

/// A handle which lends out a live database connection, either from the pool or
/// from inside an open transaction
pub trait ConnectionHandle: Send {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Abstraction over the external systems driven adapters talk to, so domain logic
/// doesn't care whether it's running inside a transaction or not
pub trait ExternalConnectivity: Send + Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// Something which can open a transaction across its external connections
pub trait Transactable: ExternalConnectivity {
    type Handle: TransactionHandle;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

/// External connectivity with an open transaction which must be committed for its changes to stick.
/// Dropping the handle without committing rolls the transaction back.
pub trait TransactionHandle: ExternalConnectivity {
    async fn commit(self) -> Result<(), anyhow::Error>;
}
