//! CPU, memory, devices and sensors.

use super::{field_value, Module};
use crate::context::{ReportContext, Sensitivity};
use crate::runner::CommandSpec;
use ar_report::Section;

pub(super) const MODULE: Module = Module {
    id: "hardware",
    title: "Hardware",
    description: "CPU, memory, block devices, PCI and USB devices, sensors",
    required_commands: &[],
    basic: true,
    handler: collect,
};

fn collect(ctx: &mut ReportContext<'_>, section: &mut Section) {
    if let Some(cpu) = ctx.command(
        section,
        "CPU",
        &CommandSpec::new("lscpu", &[]),
        Sensitivity::Plain,
    ) {
        if let Some(model) = field_value(&cpu, "Model name") {
            ctx.fact("CPU", model);
        }
    }

    if let Some(memory) = ctx.command(
        section,
        "Memory",
        &CommandSpec::new("free", &["-h"]),
        Sensitivity::Plain,
    ) {
        if let Some(total) = total_memory(&memory) {
            ctx.fact("Memory", total);
        }
    }

    ctx.command(
        section,
        "Block Devices",
        &CommandSpec::new("lsblk", &["-o", "NAME,SIZE,TYPE,FSTYPE,MOUNTPOINTS"]),
        Sensitivity::Sensitive,
    );

    if let Some(pci) = ctx.command(
        section,
        "PCI Devices",
        &CommandSpec::new("lspci", &[]),
        Sensitivity::Plain,
    ) {
        let gpus = graphics_controllers(&pci);
        if !gpus.is_empty() {
            ctx.fact("GPU", gpus.join("; "));
        }
    }

    ctx.command(
        section,
        "USB Devices",
        &CommandSpec::new("lsusb", &[]),
        Sensitivity::Plain,
    );
    ctx.command(
        section,
        "Sensors",
        &CommandSpec::new("sensors", &[]),
        Sensitivity::Plain,
    );
}

/// Total column of the `Mem:` row of `free -h`.
fn total_memory(free: &str) -> Option<String> {
    free.lines()
        .find(|l| l.starts_with("Mem:"))
        .and_then(|l| l.split_whitespace().nth(1))
        .map(str::to_string)
}

/// Device names of VGA and 3D controllers in `lspci` output.
fn graphics_controllers(lspci: &str) -> Vec<String> {
    lspci
        .lines()
        .filter_map(|l| {
            l.split_once("VGA compatible controller: ")
                .or_else(|| l.split_once("3D controller: "))
        })
        .map(|(_, device)| device.trim().to_string())
        .collect()
}
