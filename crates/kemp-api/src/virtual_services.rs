// Virtual service commands: listvs, showvs, addvs, modvs, delvs.

use tracing::debug;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;
use crate::models::{VirtualService, VirtualServiceList, VirtualServiceParams, VirtualServiceRef};

impl Client {
    /// List every virtual service.
    ///
    /// `GET listvs`
    pub async fn list_virtual_services(&self) -> Result<Vec<VirtualService>, Error> {
        debug!("listing virtual services");
        let list: VirtualServiceList = self.request(&Command::new("listvs")).await?;
        Ok(list.vs)
    }

    /// First virtual service whose nickname equals `name`.
    pub async fn find_virtual_service_by_name(
        &self,
        name: &str,
    ) -> Result<Option<VirtualService>, Error> {
        let list = self.list_virtual_services().await?;
        Ok(list.into_iter().find(|vs| vs.name == name))
    }

    /// `GET showvs?vs=…`
    pub async fn show_virtual_service(
        &self,
        target: &VirtualServiceRef,
    ) -> Result<VirtualService, Error> {
        debug!(%target, "showing virtual service");
        let cmd = target.apply(Command::new("showvs"));
        self.request(&cmd).await
    }

    /// Create a virtual service.
    ///
    /// `GET addvs?vs={ip}&port={port}&prot={tcp|udp}&…`
    ///
    /// Address, port and protocol are validated first; a bad value fails
    /// with [`Error::Validation`] and nothing is sent.
    pub async fn add_virtual_service(
        &self,
        params: &VirtualServiceParams,
    ) -> Result<VirtualService, Error> {
        params.validate()?;
        debug!(address = %params.address, port = %params.port, "adding virtual service");

        let cmd = Command::new("addvs")
            .param("vs", params.address.as_str())
            .param("port", params.port.as_str())
            .param("prot", params.protocol.as_str())
            .param_if_set("nickname", &params.name);
        let cmd = with_checks(cmd, params);
        self.request(&cmd).await
    }

    /// Modify a virtual service. Empty fields in `params` are left untouched;
    /// the two flags are always sent.
    ///
    /// `GET modvs?vs={index}&…`
    pub async fn update_virtual_service(
        &self,
        index: u32,
        params: &VirtualServiceParams,
    ) -> Result<VirtualService, Error> {
        debug!(index, "updating virtual service");

        let cmd = Command::new("modvs")
            .param("vs", index.to_string())
            .param_if_set("nickname", &params.name)
            .param_if_set("vsaddress", &params.address)
            .param_if_set("vsport", &params.port)
            .param_if_set("prot", &params.protocol);
        let cmd = with_checks(cmd, params);
        self.request(&cmd).await
    }

    /// `GET delvs?vs=…`
    pub async fn delete_virtual_service(&self, target: &VirtualServiceRef) -> Result<(), Error> {
        debug!(%target, "deleting virtual service");
        let cmd = target.apply(Command::new("delvs"));
        self.request_parameters(&cmd).await?;
        Ok(())
    }
}

/// Health-check and flag parameters shared by `addvs` and `modvs`.
fn with_checks(cmd: Command, params: &VirtualServiceParams) -> Command {
    cmd.flag("transparent", params.transparent)
        .param_if_set("checktype", &params.check_type)
        .param_if_set("checkurl", &params.check_url)
        .param_if_set("checkport", &params.check_port)
        .flag("sslacceleration", params.ssl_acceleration)
}
