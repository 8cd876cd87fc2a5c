// Real server commands.

use tracing::debug;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;
use crate::models::{RealServerParams, VirtualServiceRef};

impl Client {
    /// Attach a real server to a virtual service.
    ///
    /// `GET addrs?vs=…&rs={ip}&rsport={port}`
    pub async fn add_real_server(
        &self,
        target: &VirtualServiceRef,
        server: &RealServerParams,
    ) -> Result<(), Error> {
        server.validate()?;
        debug!(%target, address = %server.address, port = %server.port, "adding real server");

        let cmd = target
            .apply(Command::new("addrs"))
            .param("rs", server.address.as_str())
            .param("rsport", server.port.as_str());
        self.request_parameters(&cmd).await?;
        Ok(())
    }
}
