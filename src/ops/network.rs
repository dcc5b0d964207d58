use super::Operation;
use crate::common::errors::MaintError;
use crate::orchestrator::context::OpContext;

/// Flush the DNS cache and nudge mDNSResponder to drop its own. The
/// flush is required; the HUP is ancillary since mDNSResponder restarts
/// itself either way.
pub struct DnsFlush;

impl Operation for DnsFlush {
    fn id(&self) -> &'static str {
        "dns-flush"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        ctx.run_command("dscacheutil", &["-flushcache"])?;
        ctx.run_privileged_ancillary("killall", &["-HUP", "mDNSResponder"]);
        ctx.info("dns cache flushed");
        Ok(())
    }
}

const DHCP_INTERFACES: &[&str] = &["en0", "en1"];

/// Flush the routing table and renew DHCP leases. Connectivity drops for
/// a few seconds, which is why this operation is declared last in the
/// catalogue.
pub struct NetworkReset;

impl Operation for NetworkReset {
    fn id(&self) -> &'static str {
        "network-reset"
    }

    fn execute(&self, ctx: &mut OpContext) -> Result<(), MaintError> {
        ctx.run_privileged("route", &["-n", "flush"])?;

        if !ctx.confirm_step("renew DHCP leases? connectivity drops for a few seconds") {
            ctx.info("routing table flushed, dhcp renewal declined");
            return Ok(());
        }

        // Not every machine has both interfaces; a missing one is fine
        for iface in DHCP_INTERFACES {
            ctx.run_privileged_ancillary("ipconfig", &["set", iface, "DHCP"]);
        }

        ctx.info("routing table flushed, dhcp leases renewed");
        Ok(())
    }
}
