pub struct BindGroupBuilder<'a> {
    name: String,
    visibility: wgpu::ShaderStages,
    bindings: Vec<BindingConfig<'a>>,
}

struct BindingConfig<'a> {
    index: u32,
    binding_type: BindingConfigType,
    resource: wgpu::BindingResource<'a>,
}

enum BindingConfigType {
    Buffer(wgpu::BufferBindingType),
    Texture(wgpu::TextureSampleType),
    Sampler(wgpu::SamplerBindingType),
}

impl<'a> BindGroupBuilder<'a> {
    pub fn new(name: impl Into<String>, visibility: wgpu::ShaderStages) -> Self {
        BindGroupBuilder {
            name: name.into(),
            visibility,
            bindings: Vec::new(),
        }
    }

    fn push(
        mut self,
        index: u32,
        binding_type: BindingConfigType,
        resource: wgpu::BindingResource<'a>,
    ) -> Self {
        self.bindings.push(BindingConfig {
            index,
            binding_type,
            resource,
        });
        self
    }

    pub fn uniform(self, index: u32, resource: wgpu::BindingResource<'a>) -> Self {
        self.push(
            index,
            BindingConfigType::Buffer(wgpu::BufferBindingType::Uniform),
            resource,
        )
    }

    /// Filterable 2D float texture.
    pub fn texture(self, index: u32, view: &'a wgpu::TextureView) -> Self {
        self.push(
            index,
            BindingConfigType::Texture(wgpu::TextureSampleType::Float { filterable: true }),
            wgpu::BindingResource::TextureView(view),
        )
    }

    pub fn sampler(self, index: u32, sampler: &'a wgpu::Sampler) -> Self {
        self.push(
            index,
            BindingConfigType::Sampler(wgpu::SamplerBindingType::Filtering),
            wgpu::BindingResource::Sampler(sampler),
        )
    }

    pub fn build_layout(&self, device: &wgpu::Device) -> wgpu::BindGroupLayout {
        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = self
            .bindings
            .iter()
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding: binding.index,
                visibility: self.visibility,
                ty: match &binding.binding_type {
                    BindingConfigType::Buffer(buffer_type) => wgpu::BindingType::Buffer {
                        ty: *buffer_type,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    BindingConfigType::Texture(sample_type) => wgpu::BindingType::Texture {
                        sample_type: *sample_type,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    BindingConfigType::Sampler(sampler_type) => {
                        wgpu::BindingType::Sampler(*sampler_type)
                    }
                },
                count: None,
            })
            .collect();

        let layout_label = format!("{} bind group layout", self.name);

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&layout_label),
            entries: &layout_entries,
        })
    }

    /// Creates the bind group against an existing layout with matching entries.
    pub fn build_group(
        self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        let bind_entries = self
            .bindings
            .into_iter()
            .map(|binding| wgpu::BindGroupEntry {
                binding: binding.index,
                resource: binding.resource,
            })
            .collect::<Vec<_>>();

        let group_label = format!("{} bind group", self.name);

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&group_label),
            layout,
            entries: &bind_entries,
        })
    }

    pub fn build(self, device: &wgpu::Device) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
        let layout = self.build_layout(device);
        let group = self.build_group(device, &layout);
        (layout, group)
    }
}
