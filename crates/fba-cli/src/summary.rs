use console::Style;
use fba_core::deblur::params::{DerivedParams, FbaParams};
use fba_core::pipeline::config::DeblurConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_deblur_summary(config: &DeblurConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Burst Deblur"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(config.inputs.len())
    );
    for input in &config.inputs {
        println!("    {}", s.path.apply_to(input.display()));
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Execution"),
        s.method.apply_to(config.execution)
    );
    println!();

    print_params_section(&s, &config.params);
}

pub fn print_layout_summary(
    width: usize,
    height: usize,
    frames: usize,
    params: &FbaParams,
    derived: &DerivedParams,
    blocks: usize,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Burst Layout"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(frames)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{width}x{height}"))
    );
    println!();

    print_params_section(&s, params);

    println!("  {}", s.header.apply_to("Derived"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Stride"),
        s.value.apply_to(derived.stride)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Padded"),
        s.value
            .apply_to(format!("{}x{}", derived.padded_width, derived.padded_height))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Blocks"),
        s.value.apply_to(blocks)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Sigma"),
        s.value.apply_to(format!("{:.3}", derived.sigma))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Kernel"),
        s.value.apply_to(derived.kernel_size())
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Min weight"),
        s.value.apply_to(format!("{:.4}", derived.min_weight))
    );
    println!();
}

fn print_params_section(s: &Styles, params: &FbaParams) {
    println!("  {}", s.header.apply_to("Parameters"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Block size"),
        s.value.apply_to(params.block_size)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Overlap"),
        s.value
            .apply_to(format!("{:.0}%", params.block_overlap * 100.0))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Softmax"),
        s.value.apply_to(params.softmax)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Noise sigma"),
        s.value.apply_to(params.noise_sigma)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Ks"),
        s.value.apply_to(params.ks)
    );
    println!();
}
